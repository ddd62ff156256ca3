//! Drives a spring animation from a calloop event loop and prints every frame.
//!
//! Run with `RUST_LOG=debug cargo run --example spring_demo` to see the run
//! lifecycle logged alongside the frames.

use std::time::Duration;

use calloop::EventLoop;
use spring_animation::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut event_loop: EventLoop<'static, ()> = EventLoop::try_new()?;
    let scheduler = CalloopScheduler::new(event_loop.handle());
    let animator = SpringAnimator::with_config(
        scheduler,
        AnimatorConfig::default().frame_limit(120),
    );

    let signal = event_loop.get_signal();
    let spec = AnimationSpec::new(
        "transform",
        "translateY(0px)",
        "translateY(120px)",
        |frame| {
            let width = (frame.factor.max(0.0) * 40.0).round() as usize;
            println!(
                "{:>4} {:<24} {}",
                frame.frame,
                frame.formatted,
                "#".repeat(width)
            );
        },
    )
    .delay(Duration::from_millis(250))
    .on_complete(move || signal.stop());

    let mut animation = SpringAnimation::new(animator, spec);
    animation.set_should_start(true)?;

    event_loop.run(None, &mut (), |_| {})?;
    log::info!("Animation finished: {:?}", animation.animator().phase());
    Ok(())
}
