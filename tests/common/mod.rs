#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use marhaba::handlers::HandlerTarget;
use marhaba::middleware::Middleware;
use marhaba::server::{Request, Response};
use marhaba::{App, AppConfig};

pub const TEMPLATES_DIR: &str = "tests/templates";
pub const STATIC_DIR: &str = "tests/staticdata";

/// Config pointing at the fixtures under `tests/`
pub fn fixture_config() -> AppConfig {
    AppConfig::default()
        .with_templates_dir(TEMPLATES_DIR)
        .with_static_dir(STATIC_DIR)
}

/// A fresh application over the fixture directories
pub fn app() -> App {
    App::new(fixture_config())
}

/// Function target that answers with `text`
pub fn text_route(text: &'static str) -> HandlerTarget {
    HandlerTarget::function(move |_req, res, _params| {
        res.set_text(text);
        Ok(())
    })
}

/// Shared, ordered record of hook calls
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Middleware that records `<name>.before` / `<name>.after` and can be told
/// to fail in either hook
pub struct Recorder {
    pub name: &'static str,
    pub log: CallLog,
    pub fail_before: bool,
    pub fail_after: bool,
}

impl Recorder {
    pub fn new(name: &'static str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            fail_before: false,
            fail_after: false,
        })
    }

    pub fn failing_before(name: &'static str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            fail_before: true,
            fail_after: false,
        })
    }

    pub fn failing_after(name: &'static str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            fail_before: false,
            fail_after: true,
        })
    }
}

impl Middleware for Recorder {
    fn before(&self, _req: &mut Request) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(format!("{}.before", self.name));
        if self.fail_before {
            anyhow::bail!("{} refused the request", self.name);
        }
        Ok(())
    }

    fn after(
        &self,
        _req: &Request,
        _res: &mut Response,
        _latency: Duration,
    ) -> anyhow::Result<()> {
        self.log.lock().unwrap().push(format!("{}.after", self.name));
        if self.fail_after {
            anyhow::bail!("{} failed after dispatch", self.name);
        }
        Ok(())
    }
}
