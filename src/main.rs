use colored::Colorize;
use rand::{seq::SliceRandom, thread_rng};
use std::collections::HashMap;
use std::env;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use tricksterstable_ismcts::games::tricks::{Game, PLAYER_COUNT};
use tricksterstable_ismcts::ismcts::{GameState, IsmctsHandler, SearchConfig, SearchError};

trait MoveMaker {
    fn get_move(&self, game: &Game) -> Result<i32, SearchError>;
    fn get_name(&self) -> &str;
}

struct MCTSMove {
    config: SearchConfig,
}

struct RandomMove {
    id: String,
}

impl MoveMaker for MCTSMove {
    fn get_move(&self, game: &Game) -> Result<i32, SearchError> {
        let mut ismcts = IsmctsHandler::with_config(game.clone(), &self.config)?;
        ismcts.run_iterations(self.config.iterations)?;
        ismcts.debug_children();
        ismcts.best_move().ok_or(SearchError::NoLegalMoves)
    }

    fn get_name(&self) -> &str {
        "MCTS"
    }
}

impl MoveMaker for RandomMove {
    fn get_move(&self, game: &Game) -> Result<i32, SearchError> {
        game.get_moves()
            .choose(&mut thread_rng())
            .copied()
            .ok_or(SearchError::NoLegalMoves)
    }

    fn get_name(&self) -> &str {
        &self.id
    }
}

fn ismcts_play(games: usize, config: SearchConfig) -> Result<(), SearchError> {
    let mut players: Vec<Box<dyn MoveMaker>> = vec![
        Box::new(MCTSMove { config }),
        Box::new(RandomMove {
            id: String::from("random1"),
        }),
        Box::new(RandomMove {
            id: String::from("random2"),
        }),
    ];
    let mut wins: HashMap<String, usize> = HashMap::new();
    let mut total_move_time: HashMap<String, u128> = HashMap::new();
    for game_number in 0..games {
        // rotate seats so the searching player does not always lead
        players.rotate_right(1);
        let mut game = Game::new();
        let mut total_moves = 0;
        while game.result().is_none() {
            total_moves += 1;
            let player = &players[game.current_player()];
            let start = Instant::now();
            let mov = player.get_move(&game)?;
            *total_move_time
                .entry(player.get_name().to_owned())
                .or_insert(0) += start.elapsed().as_millis();
            game.apply_move(&mov);
        }

        let result = game.result().ok_or(SearchError::MissingResult)?;
        for player in 0..PLAYER_COUNT {
            if result[player] > 0.0 {
                *wins
                    .entry(players[player].get_name().to_owned())
                    .or_insert(0) += 1;
            }
        }
        debug!(game_number, total_moves, tricks = ?game.tricks_taken, "game finished");
        println!(
            "{} {} {:?}",
            "game".bold(),
            (game_number + 1).to_string().cyan(),
            game.tricks_taken
        );
    }

    let mcts_wins = wins.get("MCTS").copied().unwrap_or(0);
    println!("{} {:?}", "wins:".green().bold(), wins);
    println!("{} {:?}", "total_move_time (ms):".yellow(), total_move_time);
    info!(games, mcts_wins, "arena complete");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let games: usize = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(30);
    let iterations: usize = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(1000);
    let config = match args.get(3) {
        Some(path) => match SearchConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, path = %path, "could not load search config");
                std::process::exit(1);
            }
        },
        None => SearchConfig::default().with_iterations(iterations),
    };
    info!(
        games,
        iterations = config.iterations,
        exploration = config.exploration,
        "starting arena"
    );

    if let Err(err) = ismcts_play(games, config) {
        error!(%err, "arena aborted");
        std::process::exit(1);
    }
}
