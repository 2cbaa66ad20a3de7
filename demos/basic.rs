//! # Demo: basic
//!
//! Register/post/ignore/once walkthrough on a single thread.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait with a declarative handler catalog.
//! - Post events with arguments.
//! - Suppress a single key with `unregister_event` (additive-only).
//! - Observe fire-once consumption and weak-ownership cleanup.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use eventcast::{Dispatcher, Event, Handler, HandlerError, HandlerSet, Subscribe};

/// A toy audio player reacting to transport events.
struct Player {
    volume: Mutex<u8>,
}

impl Subscribe for Player {
    fn handlers() -> HandlerSet {
        HandlerSet::for_type::<Self>()
            .with(Handler::on("player.play"))
            .with(Handler::on("player.volume"))
            .with(Handler::on("player.ready").once())
    }

    fn deliver(&self, event: &Event) -> Result<(), HandlerError> {
        match event.key.as_str() {
            "player.ready" => {
                println!("[player] ready (this prints exactly once)");
                Ok(())
            }
            "player.play" => {
                let track = event.args.get::<String>(0)?;
                println!("[player] playing {track} at volume {}", self.volume.lock());
                Ok(())
            }
            "player.volume" => {
                *self.volume.lock() = *event.args.get::<u8>(0)?;
                println!("[player] volume set to {}", self.volume.lock());
                Ok(())
            }
            _ => Err(HandlerError::Unhandled {
                key: event.key.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "player"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let bus = Dispatcher::new();
    bus.set_trace_enabled(true);

    let player = Arc::new(Player {
        volume: Mutex::new(50),
    });
    bus.register(&player)?;

    // Keys are normalized: casing and padding do not matter.
    bus.post(Event::new(" Player.READY "))?;
    bus.post(Event::new("player.ready"))?; // consumed, no output
    bus.post(Event::new("player.volume").with_arg(80u8))?;
    bus.post(Event::new("player.play").with_arg(String::from("intro.ogg")))?;

    // Suppress one key; the others keep flowing.
    bus.unregister_event(&player, "player.play");
    bus.post(Event::new("player.play").with_arg(String::from("ignored.ogg")))?;
    bus.post(Event::new("player.volume").with_arg(30u8))?;

    // Weak ownership: once the owner drops the player, posts become no-ops.
    drop(player);
    bus.post(Event::new("player.volume").with_arg(10u8))?;
    println!("[demo] done");
    Ok(())
}
