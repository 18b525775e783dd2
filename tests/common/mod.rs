//! In-memory stand-in for the game page.
//!
//! Behaves like the real page for the selectors the bot uses: the cookie adds
//! money, buy controls spend it and raise the price by 15%, the store renders
//! a trailing blank label.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clickbot::display::{Screen, thousands};
use clickbot::session::SessionOptions;
use clickbot::{GameError, GameSurface, Result};

#[derive(Debug, Clone)]
pub struct FakeItem {
    pub name: String,
    pub price: u64,
    pub owned: u64,
}

#[derive(Debug)]
pub struct FakePage {
    pub money: u64,
    pub rate: f64,
    pub per_click: u64,
    pub store: Vec<FakeItem>,
    pub numbers_on: bool,
    /// Every selector clicked, in order
    pub clicked: Vec<String>,
    /// Selector that behaves as if the element were missing
    pub missing: Option<String>,
    pub money_text: Option<String>,
    pub closed: bool,
}

impl FakePage {
    pub fn new(store: &[(&str, u64)]) -> Self {
        Self {
            money: 0,
            rate: 0.0,
            per_click: 1,
            store: store
                .iter()
                .map(|(name, price)| FakeItem {
                    name: name.to_string(),
                    price: *price,
                    owned: 0,
                })
                .collect(),
            numbers_on: true,
            clicked: Vec::new(),
            missing: None,
            money_text: None,
            closed: false,
        }
    }

    /// The opening store of the experiment page.
    pub fn classic() -> Self {
        Self::new(&[
            ("Cursor", 15),
            ("Grandma", 100),
            ("Factory", 500),
            ("Mine", 2_000),
            ("Shipment", 7_000),
            ("Alchemy lab", 50_000),
            ("Portal", 1_000_000),
            ("Time machine", 123_456_789),
        ])
    }

    pub fn cookie_clicks(&self) -> usize {
        self.clicked.iter().filter(|s| *s == "#cookie").count()
    }

    pub fn owned(&self, name: &str) -> u64 {
        self.store
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.owned)
            .unwrap_or(0)
    }

    fn check_present(&self, selector: &str) -> Result<()> {
        if self.missing.as_deref() == Some(selector) {
            return Err(GameError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    fn buy(&mut self, name: &str) -> Result<()> {
        let item = self
            .store
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| GameError::ElementNotFound(format!("buy{}", name)))?;
        // The page ignores clicks on upgrades you cannot afford.
        if self.money >= item.price {
            self.money -= item.price;
            item.owned += 1;
            item.price = (item.price as f64 * 1.15).ceil() as u64;
            self.rate += 0.1;
        }
        Ok(())
    }
}

#[async_trait]
impl GameSurface for FakePage {
    async fn click(&mut self, selector: &str) -> Result<()> {
        self.check_present(selector)?;
        self.clicked.push(selector.to_string());
        match selector {
            "#cookie" => {
                self.money += self.per_click;
                Ok(())
            }
            "#toggleNumbers" => {
                self.numbers_on = !self.numbers_on;
                Ok(())
            }
            other => match other
                .strip_prefix("[id=\"buy")
                .and_then(|rest| rest.strip_suffix("\"]"))
            {
                Some(name) => {
                    let name = name.to_string();
                    self.buy(&name)
                }
                None => Err(GameError::ElementNotFound(other.to_string())),
            },
        }
    }

    async fn read_text(&mut self, selector: &str) -> Result<String> {
        self.check_present(selector)?;
        match selector {
            "#money" => Ok(self
                .money_text
                .clone()
                .unwrap_or_else(|| thousands(self.money))),
            "#cps" => Ok(format!("per second : {}", self.rate)),
            other => Err(GameError::ElementNotFound(other.to_string())),
        }
    }

    async fn read_all_text(&mut self, selector: &str) -> Result<Vec<String>> {
        self.check_present(selector)?;
        match selector {
            "#store div b" => {
                let mut labels: Vec<String> = self
                    .store
                    .iter()
                    .map(|i| format!("{} - {}", i.name, thousands(i.price)))
                    .collect();
                labels.push(String::new());
                Ok(labels)
            }
            ".amount" => Ok(self.store.iter().map(|i| i.owned.to_string()).collect()),
            _ => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Options pointing the report into `dir`.
pub fn options_in(dir: &std::path::Path, name: &str, target: u64) -> SessionOptions {
    let mut options = SessionOptions::new(name, target);
    options.output_dir = dir.to_path_buf();
    options
}

/// Captures everything a session prints.
#[derive(Debug, Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn screen(&self) -> Screen {
        Screen::writer(self.clone())
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// Each stats screen printed so far, oldest first.
    pub fn stats_screens(&self) -> Vec<String> {
        self.text()
            .split("\ntime elapsed: ")
            .skip(1)
            .map(str::to_string)
            .collect()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
