//! Best-score persistence
//!
//! A single integer survives across sessions, persisted to LocalStorage.
//! Storage is strictly best-effort: absent or unreadable values degrade to
//! zero, write failures are ignored, the session never crashes over it.

/// The persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore(pub u64);

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_rush_best_score";

    /// Whether a finished run beats the stored best
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.0
    }

    /// Record a finished run. Updates and persists only when the score
    /// exceeds the stored best; returns whether it did.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        self.0 = score;
        self.save();
        true
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse::<u64>() {
                    log::info!("Loaded best score: {}", best);
                    return Self(best);
                }
                log::warn!("Unreadable best score {:?}, starting from 0", raw);
            }
        }

        Self(0)
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.0.to_string());
            log::info!("Best score saved: {}", self.0);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self(0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_on_improvement() {
        let mut best = BestScore(100);
        assert!(!best.record(100));
        assert_eq!(best.0, 100);
        assert!(!best.record(99));
        assert_eq!(best.0, 100);
        assert!(best.record(101));
        assert_eq!(best.0, 101);
    }

    #[test]
    fn test_tie_is_not_a_new_best() {
        let mut best = BestScore(250);
        assert!(!best.beaten_by(250));
        assert!(!best.record(250));
        assert_eq!(best.0, 250);
    }

    #[test]
    fn test_zero_default() {
        let best = BestScore::default();
        assert!(best.beaten_by(1));
        assert!(!best.beaten_by(0));
    }
}
