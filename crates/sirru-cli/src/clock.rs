//! Drives a core controller's virtual clock, either as fast as possible or
//! in step with wall-clock time.

use std::time::Duration;

/// Call `step(frame_ms)` until it returns `false`.
///
/// With `realtime`, frames are paced by a tokio interval so one virtual
/// millisecond takes one real millisecond.
pub fn drive<F>(
    realtime: bool,
    frame_ms: u64,
    mut step: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnMut(u64) -> bool,
{
    if !realtime {
        while step(frame_ms) {}
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(frame_ms.max(1)));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            if !step(frame_ms) {
                break;
            }
        }
    });
    Ok(())
}

/// Print one value as a single JSON line.
pub fn emit<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
