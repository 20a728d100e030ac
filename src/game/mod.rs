pub mod types;
pub mod timer;
pub mod sequencer;
pub mod matcher;
pub mod name_edit;
pub mod state;
