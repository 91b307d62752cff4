use picscan::layout::{FixtureLayout, Rect, Viewport};
use picscan::{extract_images_with_layout, ExtractionSettings, ImageSource};

fn viewport_1000x800() -> Viewport {
    Viewport {
        width: 1000.0,
        height: 800.0,
        scroll_x: 0.0,
        scroll_y: 0.0,
    }
}

#[test]
fn visibility_flags_reflect_layout() {
    let html = r#"
        <img id="onscreen" src="/a.jpg">
        <img id="below" src="/b.jpg">
        <img id="near" src="/c.jpg">
    "#;
    let layout = FixtureLayout::new()
        .with_viewport(viewport_1000x800())
        .with_rect("onscreen", Rect::new(0.0, 100.0, 400.0, 300.0))
        .with_rect("below", Rect::new(0.0, 4000.0, 400.0, 300.0))
        // Not intersecting, but within 1.5x viewport height of the top
        .with_rect("near", Rect::new(0.0, 900.0, 400.0, 300.0));

    let report = match extract_images_with_layout(html, &ExtractionSettings::default(), &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    let visible_of = |url: &str| {
        report
            .images
            .iter()
            .find(|i| i.url == url)
            .map(|i| i.visible)
    };
    assert_eq!(visible_of("/a.jpg"), Some(true));
    assert_eq!(visible_of("/b.jpg"), Some(false));
    assert_eq!(visible_of("/c.jpg"), Some(true));
}

#[test]
fn attribute_dimensions_beat_natural_size() {
    // The bitmap is 800x600 but the markup says 50x50; attributes win
    let html = r#"<img id="i" src="/a.jpg" width="50" height="50">"#;
    let layout = FixtureLayout::new().with_natural_size("i", 800, 600);

    let report = match extract_images_with_layout(html, &ExtractionSettings::default(), &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].width, Some(50));
    assert_eq!(report.images[0].height, Some(50));
}

#[test]
fn small_resolved_dimensions_reject_the_record() {
    let html = r#"
        <img id="tiny" src="/tiny.jpg">
        <img id="big" src="/big.jpg">
    "#;
    let layout = FixtureLayout::new()
        .with_natural_size("tiny", 16, 16)
        .with_natural_size("big", 640, 480);

    let report = match extract_images_with_layout(html, &ExtractionSettings::default(), &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    let found: Vec<&str> = report.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(found, vec!["/big.jpg"]);
    assert_eq!(report.images[0].width, Some(640));
}

#[test]
fn computed_background_found_through_layout() {
    let html = r#"<div id="hero">banner</div>"#;
    let layout = FixtureLayout::new()
        .with_viewport(viewport_1000x800())
        .with_style("hero", "background-image", "url('/hero-bg.png')")
        .with_style("hero", "width", "960px")
        .with_style("hero", "height", "320px")
        .with_rect("hero", Rect::new(0.0, 0.0, 960.0, 320.0));

    let report = match extract_images_with_layout(html, &ExtractionSettings::default(), &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert_eq!(report.images.len(), 1);
    let image = &report.images[0];
    assert_eq!(image.url, "/hero-bg.png");
    assert_eq!(image.source, ImageSource::Background);
    assert_eq!(image.width, Some(960));
    assert_eq!(image.height, Some(320));
    assert!(image.visible);
}

#[test]
fn canvas_read_back_with_opt_in() {
    let long_pixels = format!("data:image/png;base64,{}", "Q".repeat(200));
    let html = r#"<canvas id="chart"></canvas>"#;
    let layout = FixtureLayout::new()
        .with_canvas("chart", &long_pixels)
        .with_style("chart", "width", "400px")
        .with_style("chart", "height", "300px");

    let settings = ExtractionSettings {
        include_canvas: true,
        ..ExtractionSettings::default()
    };
    let report = match extract_images_with_layout(html, &settings, &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].source, ImageSource::Canvas);
    assert_eq!(report.images[0].width, Some(400));
}

#[test]
fn tainted_canvas_does_not_abort_the_scan() {
    let html = r#"
        <canvas id="tainted"></canvas>
        <img src="/after.jpg">
    "#;
    let layout = FixtureLayout::new().with_tainted_canvas("tainted");
    let settings = ExtractionSettings {
        include_canvas: true,
        ..ExtractionSettings::default()
    };

    let report = match extract_images_with_layout(html, &settings, &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    let found: Vec<&str> = report.images.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(found, vec!["/after.jpg"]);
}

#[test]
fn pseudo_element_backgrounds_are_candidates() {
    let html = r#"<div id="deco">x</div>"#;
    let layout = FixtureLayout::new()
        .with_pseudo_content(
            "deco",
            picscan::layout::PseudoElement::Before,
            "url(/decoration.png)",
        )
        .with_rect("deco", Rect::new(0.0, 0.0, 100.0, 100.0));

    let report = match extract_images_with_layout(html, &ExtractionSettings::default(), &layout) {
        Ok(r) => r,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    };

    assert_eq!(report.images.len(), 1);
    assert_eq!(report.images[0].url, "/decoration.png");
    assert_eq!(report.images[0].source, ImageSource::Background);
}
