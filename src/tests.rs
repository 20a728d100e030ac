//! End-to-end scenarios over the game state machine, driven tick by tick.
#[cfg(test)]
mod tests {
    use crate::config::game::GameConfig;
    use crate::config::prompts::PromptDeck;
    use crate::game::matcher::{AnswerMatcher, SilentCue};
    use crate::game::state::{Effect, GameState};
    use crate::game::types::{Outcome, Phase, Prompt, Turn};

    fn game(start_secs: [u32; 2], answers: &[&str]) -> GameState {
        let config = GameConfig { start_secs, ..GameConfig::default() };
        let deck = PromptDeck::new(
            answers.iter().map(|a| Prompt::new(*a, format!("/{a}.jpg"), "")).collect(),
        )
        .expect("valid deck");
        GameState::new(&config, deck)
    }

    fn say(state: &mut GameState, text: &str) -> Vec<Effect> {
        let epoch = state.epoch();
        state.record_transcript(epoch, text, &AnswerMatcher::new(), &SilentCue)
    }

    /// Tick the active clock until something ends the game or `max` ticks pass.
    fn run_clock(state: &mut GameState, max: u32) -> u32 {
        let mut ticks = 0;
        while ticks < max && !state.is_game_over() {
            let (turn, epoch) = (state.turn(), state.epoch());
            state.tick(turn, epoch);
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_benz_then_player_two_times_out() {
        let mut state = game([15, 45], &["benz", "toyota"]);
        state.start().expect("start");

        run_clock(&mut state, 3);
        say(&mut state, "that's");
        say(&mut state, "that's a benz");
        assert!(state.last_match_confirmed());
        let epoch = state.epoch();
        state.settle(epoch);

        assert_eq!(state.turn(), Turn::PlayerTwo);
        assert_eq!(state.round_index(), 1);
        assert_eq!(state.seconds_remaining(Turn::PlayerOne), 12);

        let ticks = run_clock(&mut state, 100);
        assert_eq!(ticks, 45);
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(
            state.outcome(),
            Some(&Outcome::Winner { turn: Turn::PlayerOne, name: "Player 1".to_string() })
        );
        assert_eq!(state.seconds_remaining(Turn::PlayerOne), 12);
        assert_eq!(state.seconds_remaining(Turn::PlayerTwo), 0);
    }

    #[test]
    fn test_zero_seed_ends_before_any_speech() {
        let mut state = game([0, 45], &["benz", "toyota"]);
        let effects = state.start().expect("start");
        assert!(!effects.iter().any(|e| matches!(e, Effect::StartSpeech { .. })));
        assert_eq!(
            state.outcome(),
            Some(&Outcome::Winner { turn: Turn::PlayerTwo, name: "Player 2".to_string() })
        );
        assert!(say(&mut state, "benz").is_empty());
        assert_eq!(state.transcript(), "");
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = game([2, 45], &["benz", "toyota"]);
        state.start().expect("start");
        run_clock(&mut state, 10);
        assert!(state.is_game_over());

        let before = state.snapshot();
        for epoch in 0..4 {
            assert!(state.tick(Turn::PlayerOne, epoch).is_empty());
            assert!(state.tick(Turn::PlayerTwo, epoch).is_empty());
            assert!(state.record_transcript(epoch, "benz", &AnswerMatcher::new(), &SilentCue).is_empty());
            assert!(state.settle(epoch).is_empty());
        }
        assert!(state.abort("late").is_empty());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_previous_answer_never_matches_new_prompt() {
        let mut state = game([15, 45], &["benz", "toyota", "audi"]);
        state.start().expect("start");
        say(&mut state, "benz");
        let old_epoch = state.epoch();
        state.settle(old_epoch);

        // Late result from the previous recognition session.
        let late = state.record_transcript(old_epoch, "benz toyota", &AnswerMatcher::new(), &SilentCue);
        assert!(late.is_empty());
        assert_eq!(state.transcript(), "");

        // The new session starts empty, and the old answer is not the new one.
        assert_eq!(say(&mut state, "benz"), vec![Effect::Publish]);
        assert!(!state.last_match_confirmed());
        assert_eq!(state.round_index(), 1);
    }

    #[test]
    fn test_each_match_moves_one_round_and_one_turn() {
        let answers = ["benz", "bentley", "audi", "toyota", "honda"];
        let mut state = game([60, 60], &answers);
        state.start().expect("start");
        for (round, answer) in answers.iter().enumerate().take(answers.len() - 1) {
            let turn = state.turn();
            say(&mut state, &format!("um, {}", answer.to_uppercase()));
            let epoch = state.epoch();
            state.settle(epoch);
            assert_eq!(state.round_index(), round + 1);
            assert_eq!(state.turn(), turn.other());
            let armed: Vec<_> = [Turn::PlayerOne, Turn::PlayerTwo]
                .into_iter()
                .filter(|t| state.player(*t).timer.is_armed())
                .collect();
            assert_eq!(armed, vec![state.turn()]);
        }
        say(&mut state, "honda");
        let epoch = state.epoch();
        state.settle(epoch);
        assert_eq!(state.outcome(), Some(&Outcome::Completed));
    }

    #[test]
    fn test_builtin_deck_plays_through() {
        let mut state = GameState::new(&GameConfig::default(), PromptDeck::builtin());
        state.start().expect("start");
        let answers: Vec<String> = PromptDeck::builtin()
            .prompts()
            .iter()
            .map(|p| p.expected_answer.clone())
            .collect();
        for answer in &answers {
            say(&mut state, &format!("i think that is a {answer}"));
            let epoch = state.epoch();
            state.settle(epoch);
        }
        assert_eq!(state.outcome(), Some(&Outcome::Completed));
        assert_eq!(state.round_index(), answers.len() - 1);
    }
}
