//! # Demo: main_thread
//!
//! Main-thread affinity with a dedicated [`ThreadMarshal`].
//!
//! Handlers declared with [`Handler::on_main`] are deferred onto the
//! marshaller's serial context instead of running on the posting thread;
//! the demo posts from several worker threads and shows every render
//! callback landing on the single `eventcast-main` thread, in order.
//!
//! ## Run
//! ```bash
//! cargo run --example main_thread
//! ```

use std::sync::Arc;
use std::thread;

use eventcast::{
    Dispatcher, Event, Handler, HandlerError, HandlerSet, Subscribe, ThreadMarshal,
};

struct Renderer;

impl Subscribe for Renderer {
    fn handlers() -> HandlerSet {
        HandlerSet::for_type::<Self>()
            .with(Handler::on("frame.simulate"))
            .with(Handler::on_main("frame.render"))
    }

    fn deliver(&self, event: &Event) -> Result<(), HandlerError> {
        let frame = *event.args.get::<u32>(0)?;
        let current = thread::current();
        let name = current.name().unwrap_or("<unnamed>");
        match event.key.as_str() {
            "frame.simulate" => {
                println!("[sim]    frame {frame:>2} on {name}");
                Ok(())
            }
            "frame.render" => {
                println!("[render] frame {frame:>2} on {name}");
                Ok(())
            }
            _ => Err(HandlerError::Unhandled {
                key: event.key.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "renderer"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let marshal = Arc::new(ThreadMarshal::spawn()?);
    let bus = Arc::new(
        Dispatcher::builder()
            .with_marshal(Arc::clone(&marshal) as Arc<dyn eventcast::Marshal>)
            .build(),
    );

    let renderer = Arc::new(Renderer);
    bus.register(&renderer)?;

    let workers: Vec<_> = (0..3u32)
        .map(|w| {
            let bus = Arc::clone(&bus);
            thread::Builder::new()
                .name(format!("worker-{w}"))
                .spawn(move || {
                    for i in 0..3u32 {
                        let frame = w * 10 + i;
                        // Simulation runs right here; rendering is deferred.
                        bus.post(Event::new("frame.simulate").with_arg(frame)).unwrap();
                        bus.post(Event::new("frame.render").with_arg(frame)).unwrap();
                    }
                })
                .unwrap()
        })
        .collect();

    for worker in workers {
        let _ = worker.join();
    }

    // Finish everything queued on the main context, then stop it.
    marshal.shutdown();
    println!("[demo] done");
    Ok(())
}
