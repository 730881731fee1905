//! Best score persistence
//!
//! A single integer kept in LocalStorage under a fixed key. Read at startup,
//! written whenever a run ends above it.

/// LocalStorage key for the best score
pub const STORAGE_KEY: &str = "fiatHighScore";

/// Where the best score lives between sessions
pub trait ScoreStore {
    fn load(&self) -> Option<u64>;
    fn save(&mut self, score: u64);
}

/// Keeps the score in memory (native and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Option<u64> {
        self.value
    }

    fn save(&mut self, score: u64) {
        self.value = Some(score);
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStore {
    fn load(&self) -> Option<u64> {
        let raw = Self::storage()?.get_item(STORAGE_KEY).ok()??;
        match parse_score(&raw) {
            Some(score) => {
                log::info!("Loaded high score {}", score);
                Some(score)
            }
            None => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                None
            }
        }
    }

    fn save(&mut self, score: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        if storage.set_item(STORAGE_KEY, &score.to_string()).is_ok() {
            log::info!("High score saved ({})", score);
        }
    }
}

/// Parse a stored score; accepts plain integers and JSON numbers
pub fn parse_score(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| serde_json::from_str::<f64>(raw).ok().filter(|v| *v >= 0.0).map(|v| v as u64))
}

/// Best score tracker backed by a [`ScoreStore`]
pub struct HighScore {
    best: u64,
    store: Box<dyn ScoreStore>,
}

impl HighScore {
    /// Read the stored best score
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let best = store.load().unwrap_or(0);
        Self { best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Check if a score would set a new record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true (and persists) on a new record.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.store.save(score);
        true
    }
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}
