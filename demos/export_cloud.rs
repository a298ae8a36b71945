use hansard_cloud::directory::{cloud_data_for, CloudData, Frequencies, PersonRecord};
use hansard_cloud::{Caption, ExportOptions, ExportRenderer, LayoutOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let start = Instant::now();

    let person = PersonRecord::local("Keir Starmer")
        .with_category("Labour")
        .with_location("Holborn and St Pancras");

    let speeches = |_: &str| {
        Frequencies::Counts(
            [
                ("government", 412),
                ("country", 301),
                ("people", 288),
                ("growth", 190),
                ("nhs", 176),
                ("change", 150),
                ("security", 121),
                ("housing", 98),
                ("energy", 87),
                ("working", 80),
                ("families", 64),
                ("investment", 52),
                ("ukraine", 47),
                ("schools", 33),
                ("border", 21),
                ("a", 900),
            ]
            .into_iter()
            .map(|(w, c)| (w.to_string(), c))
            .collect(),
        )
    };

    let items = match cloud_data_for(&speeches, &person, 100) {
        CloudData::Words(items) => items,
        CloudData::NoData(message) => {
            println!("{} {}", person.name, message);
            return Ok(());
        }
    };

    let renderer = ExportRenderer::new(ExportOptions::new().seed(7));
    let caption = Caption::new(
        person.name.as_str(),
        person.category.as_deref().unwrap_or_default(),
        person.location.as_deref().unwrap_or_default(),
    );

    let outcome: LayoutOutcome = renderer.layout(&items, &mut ChaCha8Rng::seed_from_u64(7))?;
    println!(
        "Placed {} words, dropped {}",
        outcome.placed.len(),
        outcome.dropped
    );
    fs::write("cloud_export.svg", renderer.to_svg(&outcome, &caption, None))?;

    match renderer.save_png(Path::new("."), &items, &caption) {
        Some(path) => println!("Saved {}", path.display()),
        None => println!("PNG export unavailable (no usable font)"),
    }
    println!("Time elapsed: {:?}", start.elapsed());

    Ok(())
}
