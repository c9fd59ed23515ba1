extern crate scanfill;

use scanfill::{Bitmap, Outline, Point, PointTag, Rasterizer, RENDER_POOL_SIZE};

fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> (Vec<Point>, Vec<PointTag>, Vec<u16>) {
    let points = vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ];
    (points, vec![PointTag::On; 4], vec![3])
}

fn render(points: &[Point], tags: &[PointTag], contours: &[u16], w: i32, h: i32) -> Vec<u8> {
    let pitch = (w + 7) / 8;
    let mut buf = vec![0u8; (pitch * h) as usize];
    {
        let outline = Outline::new(points, tags, contours);
        let mut map = Bitmap::new(&mut buf, w, h, pitch);
        let mut ras = Rasterizer::with_pool_size(RENDER_POOL_SIZE);
        ras.render(&outline, &mut map).unwrap();
    }
    buf
}

#[test]
fn aligned_rectangle_covers_pixel_centers() {
    // [2,7) x [3,8) in pixels: pixel (x,y) is painted iff its center
    // (x+0.5, y+0.5) lies inside
    let (p, t, c) = rect(2 << 6, 3 << 6, 7 << 6, 8 << 6);
    let mut buf = render(&p, &t, &c, 10, 10);
    let map = Bitmap::new(&mut buf, 10, 10, 2);

    for y in 0..10 {
        for x in 0..10 {
            let inside = x >= 2 && x < 7 && y >= 3 && y < 8;
            assert_eq!(map.get(x, y), inside, "pixel ({},{})", x, y);
        }
    }
}

#[test]
fn fractional_rectangle_rounds_to_centers() {
    // [1.25, 3.75] x [1.25, 3.75]: centers 1.5, 2.5 and 3.5 fall inside
    let (p, t, c) = rect(80, 80, 240, 240);
    let mut buf = render(&p, &t, &c, 6, 6);
    let map = Bitmap::new(&mut buf, 6, 6, 1);

    for y in 0..6 {
        for x in 0..6 {
            let inside = x >= 1 && x <= 3 && y >= 1 && y <= 3;
            assert_eq!(map.get(x, y), inside, "pixel ({},{})", x, y);
        }
    }
}

#[test]
fn unit_square_is_one_pixel() {
    let p = vec![
        Point::pixels(4, 4),
        Point::pixels(5, 4),
        Point::pixels(5, 5),
        Point::pixels(4, 5),
    ];
    let t = vec![PointTag::On; 4];
    let mut buf = render(&p, &t, &[3], 8, 8);
    let map = Bitmap::new(&mut buf, 8, 8, 1);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(map.get(x, y), x == 4 && y == 4, "pixel ({},{})", x, y);
        }
    }
}

#[test]
fn offscreen_geometry_is_clipped() {
    // [-2,3) x [-5,12) on an 8x8 target clips to columns 0..=2
    let (p, t, c) = rect(-2 << 6, -5 << 6, 3 << 6, 12 << 6);
    let mut buf = render(&p, &t, &c, 8, 8);
    let map = Bitmap::new(&mut buf, 8, 8, 1);

    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(map.get(x, y), x < 3, "pixel ({},{})", x, y);
        }
    }
}

#[test]
fn scanline_zero_is_the_bottom() {
    // one-pixel-tall bar along the bottom; with a positive pitch that
    // row must be the last one in memory
    let (p, t, c) = rect(0, 0, 8 << 6, 1 << 6);
    let buf = render(&p, &t, &c, 8, 4);

    assert_eq!(buf, vec![0x00, 0x00, 0x00, 0xFF]);
}

#[test]
fn negative_pitch_stores_rows_bottom_up() {
    let (p, t, c) = rect(1 << 6, 0, 3 << 6, 2 << 6);

    let mut top_down = vec![0u8; 4];
    let mut bottom_up = vec![0u8; 4];
    {
        let outline = Outline::new(&p, &t, &c);
        let mut ras = Rasterizer::with_pool_size(RENDER_POOL_SIZE);

        let mut map = Bitmap::new(&mut top_down, 8, 4, 1);
        ras.render(&outline, &mut map).unwrap();

        let mut map = Bitmap::new(&mut bottom_up, 8, 4, -1);
        ras.render(&outline, &mut map).unwrap();
    }

    let flipped: Vec<u8> = top_down.iter().rev().cloned().collect();
    assert_eq!(bottom_up, flipped);

    let map_a = Bitmap::new(&mut top_down, 8, 4, 1);
    let map_b = Bitmap::new(&mut bottom_up, 8, 4, -1);
    for y in 0..4 {
        for x in 0..8 {
            assert_eq!(map_a.get(x, y), map_b.get(x, y), "pixel ({},{})", x, y);
        }
    }
}

#[test]
fn written_file_reads_back_top_row_first() {
    let (p, t, c) = rect(1 << 6, 1 << 6, 4 << 6, 3 << 6);
    let mut buf = render(&p, &t, &c, 5, 4);
    let map = Bitmap::new(&mut buf, 5, 4, 1);

    std::fs::create_dir_all("tests/tmp").unwrap();
    scanfill::write_bitmap(&map, "tests/tmp/rect.png").unwrap();

    let (data, w, h) = scanfill::read_file("tests/tmp/rect.png").unwrap();
    assert_eq!((w, h), (5, 4));
    for y in 0..4 {
        for x in 0..5 {
            // image files carry the top row first, get() counts from
            // the bottom
            let v = data[((3 - y) * 5 + x) as usize];
            let expect = if map.get(x, y) { 255 } else { 0 };
            assert_eq!(v, expect, "pixel ({},{})", x, y);
        }
    }
}
