use serde::{Deserialize, Serialize};

/// Per-tick snapshot of the game. A fresh value is produced each tick and the
/// previous one is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub elapsed_seconds: u64,
    pub is_game_over: bool,
    /// Set once the initial wave has been spawned.
    pub monsters_spawned: bool,
    pub show_warning: bool,
    /// Transient: present only on the tick it was generated.
    pub status_message: Option<String>,
}

impl GameState {
    /// `MM:SS`, with minutes allowed to exceed 59.
    pub fn formatted_time(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }

    pub fn share_message(&self) -> String {
        format!(
            "I survived the monster apocalypse for {}! Can you beat my time?",
            self.formatted_time()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(elapsed_seconds: u64) -> GameState {
        GameState {
            elapsed_seconds,
            ..GameState::default()
        }
    }

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(at(0).formatted_time(), "00:00");
        assert_eq!(at(1).formatted_time(), "00:01");
        assert_eq!(at(59).formatted_time(), "00:59");
        assert_eq!(at(60).formatted_time(), "01:00");
        assert_eq!(at(90).formatted_time(), "01:30");
        assert_eq!(at(3661).formatted_time(), "61:01");
        assert_eq!(at(5999).formatted_time(), "99:59");
    }

    #[test]
    fn default_state_is_fresh() {
        let state = GameState::default();
        assert_eq!(state.elapsed_seconds, 0);
        assert!(!state.is_game_over);
        assert!(!state.monsters_spawned);
        assert!(!state.show_warning);
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn share_message_embeds_survival_time() {
        assert_eq!(
            at(754).share_message(),
            "I survived the monster apocalypse for 12:34! Can you beat my time?"
        );
    }
}
