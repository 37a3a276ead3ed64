/// One-dimensional piecewise-linear interpolation over ascending `xs`.
///
/// Outside the sampled range the nearest endpoint value is returned; an empty
/// table yields zero.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let len = xs.len().min(ys.len());
    if len == 0 {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[len - 1] {
        return ys[len - 1];
    }
    let upper = xs[..len].partition_point(|&v| v <= x);
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    if x1 == x0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
