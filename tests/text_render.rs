use std::sync::Arc;

use easy_img::{Editor, Font, FontBook, TextAlign, TextOptions, Variant};

fn fonts_available() -> bool {
    let n = FontBook::shared().face_count();
    if n == 0 {
        eprintln!("skipping: no fonts installed");
    }
    n > 0
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of pixels with any alpha.
fn painted_bounds(ed: &Editor) -> Option<(u32, u32, u32, u32)> {
    let s = ed.surface();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..s.height() {
        for x in 0..s.width() {
            if s.pixel(x, y).unwrap()[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

#[test]
fn default_options_draw_black_text_starting_at_anchor() {
    if !fonts_available() {
        return;
    }
    let mut ed = Editor::blank(200, 100).unwrap();
    ed.text((20.0, 60.0), "Hello", &TextOptions::default())
        .unwrap();

    let (min_x, min_y, max_x, max_y) = painted_bounds(&ed).expect("text should paint pixels");
    assert!(min_x >= 18, "min_x = {min_x}");
    assert!(max_x > 40, "max_x = {max_x}");
    assert!(max_y <= 62, "max_y = {max_y}");
    assert!(min_y < 55, "min_y = {min_y}");

    let s = ed.surface();
    for y in 0..s.height() {
        for x in 0..s.width() {
            let [r, g, b, a] = s.pixel(x, y).unwrap();
            if a > 200 {
                assert!(r < 40 && g < 40 && b < 40, "pixel ({x},{y}) = {:?}", [r, g, b, a]);
            }
        }
    }
}

#[test]
fn center_and_end_alignment_move_the_text() {
    if !fonts_available() {
        return;
    }

    let mut centered = Editor::blank(200, 100).unwrap();
    centered
        .text(
            (100.0, 60.0),
            "Hello",
            &TextOptions::default().align(TextAlign::Center),
        )
        .unwrap();
    let (min_x, _, max_x, _) = painted_bounds(&centered).unwrap();
    assert!(min_x < 100 && max_x > 100, "centered bounds {min_x}..{max_x}");

    let mut ended = Editor::blank(200, 100).unwrap();
    ended
        .text(
            (180.0, 60.0),
            "Hello",
            &TextOptions::default().align(TextAlign::End),
        )
        .unwrap();
    let (min_x, _, max_x, _) = painted_bounds(&ended).unwrap();
    assert!(max_x <= 182, "max_x = {max_x}");
    assert!(min_x < 170, "min_x = {min_x}");
}

#[test]
fn color_option_sets_fill() {
    if !fonts_available() {
        return;
    }
    let mut ed = Editor::blank(120, 60).unwrap();
    ed.text(
        (5.0, 40.0),
        "Red",
        &TextOptions::default()
            .color("#ff0000")
            .font(Font::poppins(32, Variant::Bold)),
    )
    .unwrap();

    let s = ed.surface();
    let mut opaque = 0;
    for y in 0..s.height() {
        for x in 0..s.width() {
            let [r, g, b, a] = s.pixel(x, y).unwrap();
            if a > 200 {
                opaque += 1;
                assert!(r > 200 && g < 60 && b < 60, "pixel ({x},{y})");
            }
        }
    }
    assert!(opaque > 0);
}

#[test]
fn extended_color_names_fill_text() {
    if !fonts_available() {
        return;
    }
    let mut ed = Editor::blank(120, 60).unwrap();
    ed.text(
        (5.0, 40.0),
        "Hi",
        &TextOptions::default().color("orangered"),
    )
    .unwrap();

    let s = ed.surface();
    let mut opaque = 0;
    for y in 0..s.height() {
        for x in 0..s.width() {
            let [r, g, b, a] = s.pixel(x, y).unwrap();
            if a > 220 {
                opaque += 1;
                assert!(r > 230 && g > 40 && g < 100 && b < 30, "pixel ({x},{y})");
            }
        }
    }
    assert!(opaque > 0);
}

#[test]
fn text_composites_over_existing_content() {
    if !fonts_available() {
        return;
    }
    let bg = easy_img::Image::from_rgba8(100, 50, [255, 255, 255, 255].repeat(5000)).unwrap();
    let mut ed = Editor::new(&bg).unwrap().with_fonts(FontBook::shared());
    ed.text((10.0, 35.0), "Hi", &TextOptions::default()).unwrap();

    let s = ed.surface();
    assert_eq!(s.pixel(99, 0), Some([255, 255, 255, 255]));
    let mut dark = 0;
    for y in 0..s.height() {
        for x in 0..s.width() {
            let px = s.pixel(x, y).unwrap();
            assert_eq!(px[3], 255);
            if px[0] < 60 {
                dark += 1;
            }
        }
    }
    assert!(dark > 0);
}

#[test]
fn custom_empty_font_book_makes_text_fail() {
    let mut ed = Editor::blank(10, 10)
        .unwrap()
        .with_fonts(Arc::new(FontBook::empty()));
    assert!(ed.text((0.0, 8.0), "x", &TextOptions::default()).is_err());
}
