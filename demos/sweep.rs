use speedometer::{Gear, Speedometer, SpeedometerConfig};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = SpeedometerConfig::builder()
        .title("Speedometer Sweep")
        .build();

    let mut speedometer = Speedometer::new(config);

    let (sender, receiver) = mpsc::channel();

    // Accelerate through the dial and back with some jitter, shifting now and then
    thread::spawn(move || {
        let mut rng = rand::rng();
        let ramp = (0..=120).chain((0..120).rev());
        for speed in ramp.cycle() {
            let jitter: i32 = rng.random_range(-2..=2);
            let mut tokens = vec![(speed + jitter).to_string()];
            if rng.random_range(0..40) == 0 {
                let gear = Gear::ALL[rng.random_range(0..Gear::ALL.len())];
                tokens.push(gear.symbol().to_string());
            }

            if tokens.into_iter().any(|token| sender.send(token).is_err()) {
                break;
            }

            thread::sleep(Duration::from_millis(50));
        }
    });

    println!("Sweeping the needle between 0 and 120 MPH with random gear changes");
    println!("Press Escape or close the window to exit");

    speedometer.show_with_tokens(receiver)?;
    Ok(())
}
