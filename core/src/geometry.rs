pub const CARDINAL_EPSILON: f32 = 1e-4;

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

pub fn direction(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    (b.0 - a.0, b.1 - a.1)
}

/// Collapses a vector to the cardinal axis it runs along: each component
/// becomes -1, 0, or +1, with magnitudes below `CARDINAL_EPSILON` treated
/// as zero.
pub fn cardinal(v: (f32, f32)) -> (f32, f32) {
    (cardinal_axis(v.0), cardinal_axis(v.1))
}

fn cardinal_axis(value: f32) -> f32 {
    if value.abs() < CARDINAL_EPSILON {
        0.0
    } else if value > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Rotates `v` by `degrees`. A positive angle is the mathematical positive
/// direction; `clockwise` negates it.
pub fn rotate_vec(v: (f32, f32), clockwise: bool, degrees: f32) -> (f32, f32) {
    let theta = degrees.to_radians() * if clockwise { -1.0 } else { 1.0 };
    let (sin, cos) = theta.sin_cos();
    (v.0 * cos - v.1 * sin, v.0 * sin + v.1 * cos)
}

pub fn add(p: (f32, f32), v: (f32, f32)) -> (f32, f32) {
    (p.0 + v.0, p.1 + v.1)
}

pub fn sub(p: (f32, f32), v: (f32, f32)) -> (f32, f32) {
    (p.0 - v.0, p.1 - v.1)
}

pub fn scale(v: (f32, f32), factor: f32) -> (f32, f32) {
    (v.0 * factor, v.1 * factor)
}
