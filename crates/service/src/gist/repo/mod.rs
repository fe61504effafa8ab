pub mod seaorm;

pub use seaorm::SeaOrmGistRepository;
