//! Monotone-in-x cubic interpolation (Steffen's method) for line paths.

use super::svg::fmt_num;

fn sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Tangent at `b` given its neighbours.
fn slope3(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let h0 = b.0 - a.0;
    let h1 = c.0 - b.0;
    if h0 == 0.0 || h1 == 0.0 {
        return 0.0;
    }
    let s0 = (b.1 - a.1) / h0;
    let s1 = (c.1 - b.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

/// One-sided tangent at an end point of the segment `a -> b`.
fn slope2(a: (f64, f64), b: (f64, f64), t: f64) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 {
        t
    } else {
        (3.0 * (b.1 - a.1) / h - t) / 2.0
    }
}

fn tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let mut out = vec![0.0; n];
    for i in 1..n - 1 {
        out[i] = slope3(points[i - 1], points[i], points[i + 1]);
    }
    out[0] = slope2(points[0], points[1], out[1]);
    out[n - 1] = slope2(points[n - 2], points[n - 1], out[n - 2]);
    out
}

/// SVG path data for pixel-space points sorted by x. Returns `None` when
/// there are fewer than two points.
pub fn monotone_x_path(points: &[(f64, f64)]) -> Option<String> {
    match points.len() {
        0 | 1 => None,
        2 => Some(format!(
            "M{},{}L{},{}",
            fmt_num(points[0].0),
            fmt_num(points[0].1),
            fmt_num(points[1].0),
            fmt_num(points[1].1)
        )),
        _ => {
            let t = tangents(points);
            let mut path = format!("M{},{}", fmt_num(points[0].0), fmt_num(points[0].1));
            for i in 0..points.len() - 1 {
                let (x0, y0) = points[i];
                let (x1, y1) = points[i + 1];
                let dx = (x1 - x0) / 3.0;
                path.push_str(&format!(
                    "C{},{},{},{},{},{}",
                    fmt_num(x0 + dx),
                    fmt_num(y0 + dx * t[i]),
                    fmt_num(x1 - dx),
                    fmt_num(y1 - dx * t[i + 1]),
                    fmt_num(x1),
                    fmt_num(y1)
                ));
            }
            Some(path)
        }
    }
}

/// Approximate path length for stroke-reveal animation.
pub fn polyline_length(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            let dx = pair[1].0 - pair[0].0;
            let dy = pair[1].1 - pair[0].1;
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs() {
        assert_eq!(monotone_x_path(&[]), None);
        assert_eq!(monotone_x_path(&[(1.0, 1.0)]), None);
        assert_eq!(
            monotone_x_path(&[(0.0, 10.0), (30.0, 0.0)]).as_deref(),
            Some("M0,10L30,0")
        );
    }

    #[test]
    fn collinear_points_stay_straight() {
        let path = monotone_x_path(&[(0.0, 0.0), (30.0, 30.0), (60.0, 60.0)]).unwrap();
        assert_eq!(path, "M0,0C10,10,20,20,30,30C40,40,50,50,60,60");
    }

    #[test]
    fn local_extremum_has_flat_tangent() {
        let pts = [(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)];
        let t = tangents(&pts);
        assert_eq!(t[1], 0.0);
    }

    #[test]
    fn length_of_right_triangle_legs() {
        assert_eq!(polyline_length(&[(0.0, 0.0), (3.0, 4.0)]), 5.0);
    }
}
