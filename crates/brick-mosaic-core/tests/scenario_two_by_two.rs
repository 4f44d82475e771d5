use brick_mosaic_core::prelude::*;

fn red_blue() -> Palette {
    Palette::new(vec![
        PaletteColor::new(1, "Red", "#FF0000", "Reds"),
        PaletteColor::new(2, "Blue", "#0000FF", "Blues"),
    ])
    .unwrap()
}

#[test]
fn red_pair_on_top_blue_singles_below() {
    let palette = red_blue();
    let red = Rgb::new(255, 0, 0);
    let blue = Rgb::new(0, 0, 255);
    let pixels = vec![red, red, blue, blue];
    let inventory = Inventory::new(vec![
        InventoryEntry::new(1, 1, 2, 1),
        InventoryEntry::new(2, 1, 1, 2),
    ]);

    let out = generate(&pixels, 2, 2, &inventory, true, &palette).expect("generation");

    assert_eq!(out.placed_pieces.len(), 3);
    let first = &out.placed_pieces[0];
    assert_eq!((first.x, first.y), (0, 0));
    assert_eq!(first.color_id, 1);
    // the 1x2 stock shape is laid rotated along the red row
    assert_eq!((first.width, first.height), (2, 1));
    assert!(first.from_stock);

    let blues: Vec<_> = out.placed_pieces[1..].iter().collect();
    assert_eq!((blues[0].x, blues[0].y, blues[0].width, blues[0].height), (0, 1, 1, 1));
    assert_eq!((blues[1].x, blues[1].y, blues[1].width, blues[1].height), (1, 1, 1, 1));
    assert!(blues.iter().all(|p| p.color_id == 2 && p.color_hex == "#0000FF"));

    assert!(out.missing_bricks.is_empty());
    assert_eq!(
        out.used_inventory.get(&UsageKey::new(1, Dimensions::new(1, 2))),
        Some(&1)
    );
    assert_eq!(out.used_inventory.get(&UsageKey::new(2, Dimensions::UNIT)), Some(&2));
    assert!(out.pixels.iter().all(|p| !p.is_substituted));
}

#[test]
fn piece_ids_are_sequential() {
    let palette = red_blue();
    let pixels = vec![Rgb::new(250, 5, 5); 4];
    let cfg = MosaicConfig::builder()
        .with_dimensions(2, 2)
        .piece_id_prefix("brick")
        .build();
    let out = generate_mosaic(&pixels, &Inventory::default(), &palette, &cfg).unwrap();
    let ids: Vec<&str> = out.placed_pieces.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["brick-0", "brick-1", "brick-2", "brick-3"]);
}
