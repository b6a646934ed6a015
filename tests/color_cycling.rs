use metricharts::color::{ColorAllocator, ColorChoice, PALETTE, Rgb, alter_brightness};

#[test]
fn palette_cycles_in_order_and_wraps() {
    let mut alloc = ColorAllocator::new();
    for &expected in PALETTE.iter() {
        assert_eq!(alloc.next_color(), Rgb::from_u32(expected));
    }
    // One full rotation later the sequence starts over.
    assert_eq!(alloc.next_color(), Rgb::from_u32(PALETTE[0]));
    assert_eq!(alloc.next_color(), Rgb::from_u32(PALETTE[1]));
}

#[test]
fn config_color_seats_rotation_at_selected_entry() {
    let mut alloc = ColorAllocator::new();
    let chosen = Rgb::from_u32(PALETTE[4]);
    assert_eq!(alloc.config_color(chosen), chosen);
    // The rotation continues from just past the seated color.
    assert_eq!(alloc.next_color(), Rgb::from_u32(PALETTE[5]));
}

#[test]
fn config_color_outside_palette_restarts_rotation() {
    let mut alloc = ColorAllocator::new();
    alloc.next_color();
    alloc.next_color();
    let custom = Rgb::from_u32(0x123456);
    assert_eq!(alloc.config_color(custom), Rgb::from_u32(PALETTE[0]));
    assert_eq!(alloc.next_color(), Rgb::from_u32(PALETTE[1]));
}

#[test]
fn for_choice_treats_white_as_auto() {
    let mut alloc = ColorAllocator::new();
    let (color, _) = alloc.for_choice(ColorChoice::Explicit(Rgb::new(0xFF, 0xFF, 0xFF)));
    assert_eq!(color, Rgb::from_u32(PALETTE[0]));
    let (next, _) = alloc.for_choice(ColorChoice::Auto);
    assert_eq!(next, Rgb::from_u32(PALETTE[1]));
}

#[test]
fn line_color_is_darkened_series_color() {
    let mut alloc = ColorAllocator::new();
    let (color, line) = alloc.for_choice(ColorChoice::Auto);
    assert_eq!(line, alter_brightness(color, -70.0));
    // 0x1199FF at 30% channel intensity.
    assert_eq!(line, Rgb::new(5, 46, 77));
}

#[test]
fn brightness_clamps_at_channel_bounds() {
    let lightened = alter_brightness(Rgb::new(200, 200, 200), 50.0);
    assert_eq!(lightened, Rgb::new(255, 255, 255));
    let darkened = alter_brightness(Rgb::new(10, 10, 10), -100.0);
    assert_eq!(darkened, Rgb::new(0, 0, 0));
}

#[test]
fn rgb_parses_and_serializes_hex() {
    let color = Rgb::parse("#1199FF").unwrap();
    assert_eq!(color, Rgb::from_u32(0x1199FF));
    assert_eq!(color.hex(), "#1199ff");
    assert!(Rgb::parse("not-a-color").is_err());

    let choice: ColorChoice = serde_json::from_str("\"auto\"").unwrap();
    assert_eq!(choice, ColorChoice::Auto);
    let choice: ColorChoice = serde_json::from_str("\"#db4230\"").unwrap();
    assert_eq!(choice, ColorChoice::Explicit(Rgb::from_u32(0xDB4230)));
    let choice: ColorChoice = serde_json::from_str("1153535").unwrap();
    assert_eq!(choice, ColorChoice::Explicit(Rgb::from_u32(1153535)));
}
