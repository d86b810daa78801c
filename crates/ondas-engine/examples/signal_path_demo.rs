//! Signal path demo: a live engine thread, algorithm switching, the mute
//! ramp, and a tag-store commit under full exclusion.
//!
//! Run with: cargo run -p ondas-engine --example signal_path_demo

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ondas_core::BLOCK_FRAMES;
use ondas_engine::{
    AudioEngine, DuplexTransport, FrameSink, FrameSource, MemoryTagStore, TagStore,
};

/// Square-wave test source at roughly 750 Hz.
struct SquareSource {
    phase: u32,
}

impl FrameSource for SquareSource {
    fn fill(&mut self, frame: &mut [i16]) {
        for pair in frame.chunks_exact_mut(2) {
            let s = if (self.phase / BLOCK_FRAMES as u32) % 2 == 0 {
                8000
            } else {
                -8000
            };
            pair[0] = s;
            pair[1] = s;
            self.phase += 1;
        }
    }
}

struct NullSink;

impl FrameSink for NullSink {
    fn drain(&mut self, _frame: &[i16]) {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mut engine = AudioEngine::new();
    let handle = engine.handle();
    let shared = Arc::clone(engine.shared());

    // Pump the transport on its own thread, like the dedicated audio core.
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let pump = thread::spawn(move || {
        let mut transport = DuplexTransport::new();
        let mut source = SquareSource { phase: 0 };
        let mut sink = NullSink;
        while !stop_flag.load(Ordering::Relaxed) {
            transport.pump(&mut engine, &mut source, &mut sink);
            // Real hardware paces this at the frame rate.
            thread::sleep(Duration::from_micros(600));
        }
    });

    println!("=== Startup ===");
    println!("mute state: {:?}", shared.mute_state());
    handle.set_mute(false);
    println!("after unmute: {:?}", shared.mute_state());

    // Run the delay at half wet.
    shared.set_channel(1, 2048);
    handle.select_algorithm(2);
    handle.params().set(1, 2000); // delay amount
    handle.params().set(2, 2800); // feedback
    thread::sleep(Duration::from_millis(100));

    println!("\n=== Running ===");
    println!("algorithm index: {}", shared.algorithm());
    let levels = shared.take_levels();
    println!(
        "peaks in {}/{} out {}/{}",
        levels[0], levels[1], levels[2], levels[3]
    );
    println!("load: {}%", shared.load_percent());

    // Persist settings under the full exclusion sequence.
    println!("\n=== Commit ===");
    let mut store = MemoryTagStore::new();
    store.put(0, shared.algorithm() as i16);
    store.put(1, handle.params().get(1));
    store.put(2, handle.params().get(2));
    match handle.commit_store(&mut store) {
        Ok(()) => println!(
            "committed {} tags, audio restored ({:?})",
            3,
            shared.mute_state()
        ),
        Err(e) => println!("commit failed: {e}"),
    }

    stop.store(true, Ordering::Relaxed);
    pump.join().unwrap();
    println!("\ndone");
}
