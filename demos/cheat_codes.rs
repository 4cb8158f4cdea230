//! Type cheat codes on stdin and watch them fire.
//!
//! ```text
//! cargo run --example cheat_codes
//! RUST_LOG=lazy_aho=trace cargo run --example cheat_codes
//! ```
//!
//! Every line is streamed symbol by symbol without resetting between lines,
//! exactly as a game loop would feed keystrokes. `f` and `q` are reserved for
//! the game and never reach the recognizer.

use std::io::{self, BufRead};

use lazy_aho::{CommandSet, Config};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug)]
enum Cheat {
    GodMode,
    Area,
    AutoWin,
    Shortcut,
    Hint,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::new().with_reserved(b"fq").with_prewarm(true);
    let mut cheats = CommandSet::with_config(config);
    cheats.register("godmode", Cheat::GodMode)?;
    cheats.register("area", Cheat::Area)?;
    cheats.register("autowin", Cheat::AutoWin)?;
    cheats.register("shortcut", Cheat::Shortcut)?;
    cheats.register("hint", Cheat::Hint)?;

    println!("Registered {} cheat codes. Start typing.", cheats.len());

    let mut god_mode = false;
    for line in io::stdin().lock().lines() {
        let line = line?;
        for &symbol in line.as_bytes() {
            for cheat in cheats.feed(symbol) {
                match cheat {
                    Cheat::GodMode => {
                        god_mode = !god_mode;
                        println!("god mode {}", if god_mode { "on" } else { "off" });
                    }
                    other => println!("{other:?}!"),
                }
            }
        }
    }
    Ok(())
}
