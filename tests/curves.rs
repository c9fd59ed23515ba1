extern crate scanfill;

use scanfill::{
    split_conic, split_cubic, Bitmap, CurvePoint, DropoutMode, Outline, Point, PointTag,
    Rasterizer, RENDER_POOL_SIZE,
};

fn cp(x: i64, y: i64) -> CurvePoint {
    CurvePoint::new(x, y)
}

#[test]
fn conic_split_meets_at_the_curve_midpoint() {
    // start in arc[2], control in arc[1], end in arc[0]
    let mut arc = [cp(128, 0), cp(64, 64), cp(0, 0), cp(0, 0), cp(0, 0)];
    split_conic(&mut arc);

    // near-start half in arc[2..=4]
    assert_eq!(arc[4], cp(0, 0));
    assert_eq!(arc[3], cp(32, 32));
    // the shared point is B(1/2) = (p0 + 2c + p1) / 4
    assert_eq!(arc[2], cp(64, 32));
    // far half in arc[0..=2]
    assert_eq!(arc[1], cp(96, 32));
    assert_eq!(arc[0], cp(128, 0));
}

#[test]
fn conic_split_truncates_odd_midpoints() {
    let mut arc = [cp(5, 0), cp(2, 3), cp(1, 1), cp(0, 0), cp(0, 0)];
    split_conic(&mut arc);

    assert_eq!(arc[4], cp(1, 1));
    assert_eq!(arc[3], cp(1, 2));
    assert_eq!(arc[2], cp(2, 1));
    assert_eq!(arc[1], cp(3, 1));
    assert_eq!(arc[0], cp(5, 0));
}

#[test]
fn cubic_split_rounds_midpoints_half_up() {
    // start in arc[3], controls in arc[2] and arc[1], end in arc[0]
    let mut arc = [
        cp(64, 0),
        cp(64, 64),
        cp(0, 64),
        cp(0, 0),
        cp(0, 0),
        cp(0, 0),
        cp(0, 0),
    ];
    split_cubic(&mut arc);

    // near-start half in arc[3..=6]
    assert_eq!(arc[6], cp(0, 0));
    assert_eq!(arc[5], cp(0, 32));
    assert_eq!(arc[4], cp(16, 48));
    // the shared point is B(1/2) = (p0 + 3c1 + 3c2 + p1) / 8
    assert_eq!(arc[3], cp(32, 48));
    // far half in arc[0..=3]
    assert_eq!(arc[2], cp(48, 48));
    assert_eq!(arc[1], cp(64, 32));
    assert_eq!(arc[0], cp(64, 0));
}

fn render(
    points: &[Point],
    tags: &[PointTag],
    contours: &[u16],
    w: i32,
    h: i32,
    high_precision: bool,
) -> Vec<u8> {
    let pitch = (w + 7) / 8;
    let mut buf = vec![0u8; (pitch * h) as usize];
    {
        let mut outline = Outline::new(points, tags, contours);
        outline.high_precision = high_precision;
        let mut map = Bitmap::new(&mut buf, w, h, pitch);
        let mut ras = Rasterizer::with_pool_size(RENDER_POOL_SIZE);
        ras.set_dropout_mode(DropoutMode::Simple);
        ras.render(&outline, &mut map).unwrap();
    }
    buf
}

/// Compare every pixel against `set`, except those `skip` marks as too
/// close to the exact curve boundary to pin down.
fn check_grid<S, K>(buf: &mut Vec<u8>, w: i32, h: i32, set: S, skip: K)
where
    S: Fn(i32, i32) -> bool,
    K: Fn(i32, i32) -> bool,
{
    let map = Bitmap::new(buf, w, h, (w + 7) / 8);
    for y in 0..h {
        for x in 0..w {
            if skip(x, y) {
                continue;
            }
            assert_eq!(map.get(x, y), set(x, y), "pixel ({},{})", x, y);
        }
    }
}

/// One conic from (2,2) through control (6,8) to (10,2), closed along
/// the base line. The curve is y = 2 + 12t(1-t) over x = 2 + 8t, so
/// the apex sits at y = 5 and the row spans solve exactly:
/// rows 2, 3, 4 cover x in [2.35, 9.65], [3.17, 8.83] and [4.37, 7.63].
fn conic_arch() -> (Vec<Point>, Vec<PointTag>, Vec<u16>) {
    let points = vec![
        Point::pixels(2, 2),
        Point::pixels(6, 8),
        Point::pixels(10, 2),
    ];
    let tags = vec![PointTag::On, PointTag::Conic, PointTag::On];
    (points, tags, vec![2])
}

fn conic_set(x: i32, y: i32) -> bool {
    (y == 2 && x >= 3 && x <= 8) || (y == 3 && x >= 4 && x <= 7) || (y == 4 && (x == 5 || x == 6))
}

fn conic_skip(x: i32, y: i32) -> bool {
    (y == 2 && (x == 2 || x == 9))
        || (y == 3 && (x == 3 || x == 8))
        || (y == 4 && (x == 4 || x == 7))
}

#[test]
fn conic_arch_fills_rows_up_to_its_apex() {
    let (p, t, c) = conic_arch();
    let mut buf = render(&p, &t, &c, 12, 8, false);
    check_grid(&mut buf, 12, 8, conic_set, conic_skip);
}

#[test]
fn high_precision_tracing_agrees_on_the_arch() {
    let (p, t, c) = conic_arch();
    let mut buf = render(&p, &t, &c, 12, 8, true);
    check_grid(&mut buf, 12, 8, conic_set, conic_skip);
}

#[test]
fn cubic_bump_fills_rows_up_to_its_apex() {
    // (2,2) to (10,2) with controls (4,7) and (8,7); the height is
    // y = 2 + 15t(1-t), peaking at 5.75, and the row spans are
    // [2.21, 9.79], [2.75, 9.25], [3.50, 8.50] and [4.85, 7.15]
    let points = vec![
        Point::pixels(2, 2),
        Point::pixels(4, 7),
        Point::pixels(8, 7),
        Point::pixels(10, 2),
    ];
    let tags = vec![
        PointTag::On,
        PointTag::Cubic,
        PointTag::Cubic,
        PointTag::On,
    ];
    let mut buf = render(&points, &tags, &[3], 12, 8, false);

    let set = |x: i32, y: i32| {
        (y == 2 && x >= 3 && x <= 8)
            || (y == 3 && x >= 3 && x <= 8)
            || (y == 4 && x >= 4 && x <= 7)
            || (y == 5 && (x == 5 || x == 6))
    };
    let skip = |x: i32, y: i32| {
        (y == 2 && (x == 2 || x == 9))
            || (y == 3 && (x == 2 || x == 9))
            || (y == 4 && (x == 3 || x == 8))
            || (y == 5 && (x == 4 || x == 7))
    };
    check_grid(&mut buf, 12, 8, set, skip);
}

/// A square with each corner rounded by one conic: on-points at the
/// edge midpoints, one control per corner. `start` rotates the ring.
fn rounded_square(start: usize) -> (Vec<Point>, Vec<PointTag>, Vec<u16>) {
    let xy = [(4, 1), (7, 1), (7, 4), (7, 7), (4, 7), (1, 7), (1, 4), (1, 1)];
    let mut points = Vec::new();
    let mut tags = Vec::new();
    for i in 0..8 {
        let (x, y) = xy[(start + i) % 8];
        points.push(Point::pixels(x, y));
        tags.push(if (start + i) % 2 == 0 {
            PointTag::On
        } else {
            PointTag::Conic
        });
    }
    (points, tags, vec![7])
}

#[test]
fn contour_may_start_on_an_off_point() {
    // opening the ring on a corner control instead must not move a
    // pixel: tracing backs up to the on-point listed last
    let (p, t, c) = rounded_square(0);
    let base = render(&p, &t, &c, 8, 8, false);
    assert!(base.iter().any(|&v| v != 0));

    let (p, t, c) = rounded_square(1);
    let turned = render(&p, &t, &c, 8, 8, false);
    assert_eq!(base, turned);
}

// A teardrop hung from the on-point (4,1): down through the control at
// (8,4), back up through (0,4). The consecutive controls stand for an
// implied on-point at their midpoint (4,4).
fn teardrop() -> (Vec<Point>, Vec<PointTag>, Vec<u16>) {
    let points = vec![Point::pixels(4, 1), Point::pixels(8, 4), Point::pixels(0, 4)];
    let tags = vec![PointTag::On, PointTag::Conic, PointTag::Conic];
    (points, tags, vec![2])
}

#[test]
fn consecutive_off_points_imply_their_midpoint() {
    let (p, t, c) = teardrop();
    let implied = render(&p, &t, &c, 8, 8, false);
    assert!(implied.iter().any(|&v| v != 0));

    // the same shape with the midpoint written out
    let points = vec![
        Point::pixels(4, 1),
        Point::pixels(8, 4),
        Point::pixels(4, 4),
        Point::pixels(0, 4),
    ];
    let tags = vec![
        PointTag::On,
        PointTag::Conic,
        PointTag::On,
        PointTag::Conic,
    ];
    let spelled = render(&points, &tags, &[3], 8, 8, false);

    assert_eq!(implied, spelled);
}

#[test]
fn conic_pair_may_wrap_around_the_contour_start() {
    // listing the ring from its other control puts off-points both
    // first and last; the trace then opens at their midpoint (4,4)
    let (p, t, c) = teardrop();
    let base = render(&p, &t, &c, 8, 8, false);

    let points = vec![Point::pixels(0, 4), Point::pixels(4, 1), Point::pixels(8, 4)];
    let tags = vec![PointTag::Conic, PointTag::On, PointTag::Conic];
    let wrapped = render(&points, &tags, &[2], 8, 8, false);

    assert_eq!(base, wrapped);
}
