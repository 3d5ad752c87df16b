pub mod scores;

pub use scores::{score_out_of_ten, EncryptedScores, Scores, SCORE_COUNT, WEIGHTS};
