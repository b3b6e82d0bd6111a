use decay_rng::{discover_devices, DecayRng, RandomSource, RawDecayRng};

fn main() -> Result<(), decay_rng::DecayRngError> {
    // Discover attached detector boards
    let devices = discover_devices();
    if devices.is_empty() {
        eprintln!("No detector boards found.");
        std::process::exit(1);
    }
    for dev in &devices {
        println!(
            "Found: {} — {:04x}:{:04x} (serial {})",
            dev.port,
            dev.vid,
            dev.pid,
            dev.serial_number.as_deref().unwrap_or("?")
        );
    }

    // Whitened output (the secure accessor)
    let rng = DecayRng::open(None, None)?;
    let bytes = rng.get_random(32)?;
    println!("\nWhitened:    {}", hex::encode(&bytes));

    let more = rng.get_random(32)?;
    println!("Whitened:    {}", hex::encode(&more));
    rng.close();

    // Raw detector bytes — for entropy-quality vetting only. The board is
    // slow (every byte costs eight detector pulses), so keep samples small.
    let raw = RawDecayRng::open(None, None)?;
    let sample = raw.get_random(16)?;
    println!("Raw:         {}", hex::encode(&sample));
    raw.close();

    Ok(())
}
