use hansard_cloud::viewport::TouchPoint;
use hansard_cloud::{rank_frequencies, GestureEvent, InteractiveCloud};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let table = [
        ("economy", 50),
        ("tax", 30),
        ("housing", 22),
        ("farmers", 14),
        ("nhs", 10),
        ("rail", 4),
    ];
    let items = rank_frequencies(table, 100, Some("Liberal Democrat"));

    let mut cloud = InteractiveCloud::new((1280.0, 800.0), (1000.0, 800.0), Some(1));
    cloud.set_items(items)?;
    for (i, word) in cloud.placed().iter().enumerate() {
        let style = cloud
            .outcome()
            .and_then(|o| o.range)
            .map(|range| word.style(range, i));
        println!(
            "{:<10} size {:>5.1} at ({:>6.1}, {:>6.1}) {:?}",
            word.text, word.font_size, word.x, word.y, style
        );
    }

    cloud.handle_gesture(&GestureEvent::TouchStart(vec![
        TouchPoint::new(100.0, 100.0),
        TouchPoint::new(200.0, 100.0),
    ]));
    cloud.handle_gesture(&GestureEvent::TouchMove(vec![
        TouchPoint::new(50.0, 100.0),
        TouchPoint::new(250.0, 100.0),
    ]));
    cloud.handle_gesture(&GestureEvent::TouchEnd);
    println!("After pinch: {:?}", cloud.transform());

    let relaid = cloud.resize((390.0, 844.0), (390.0, 700.0))?;
    println!(
        "Rotated to phone: relayout={} layout box={:?}",
        relaid,
        cloud.controller().layout_size()
    );

    Ok(())
}
