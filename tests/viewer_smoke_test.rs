#[cfg(feature = "integration-tests")]
mod common;

/// Opens the café in a real window and tears it down through the stop handle.
///
/// Needs a display and a GPU adapter. winit allows one event loop per
/// process, so this file holds a single test.
#[test]
#[cfg(feature = "integration-tests")]
fn should_open_and_close_the_cafe() {
    use std::{thread, time::Duration};

    use flow_diorama::{StopHandle, ViewerConfig, run_until};

    let stop = StopHandle::new();
    let stopper = {
        let stop = stop.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(2));
            stop.stop();
        })
    };

    let config = ViewerConfig::default()
        .with_title("café smoke test")
        .with_size(640, 480);
    let result = run_until(config, stop.clone());

    stopper.join().unwrap();
    assert!(result.is_ok(), "viewer failed: {:?}", result.err());
    assert!(stop.is_stopped());
}
