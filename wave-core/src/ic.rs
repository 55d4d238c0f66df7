use crate::params::DerivedParams;

/// Peak height of the initial pulse.
pub const PULSE_PEAK: f64 = 0.25;

/// Uniform grid with `ngrid` points, `x[0] = x1` and `x[ngrid - 1] = x2`.
pub fn grid(p: &DerivedParams) -> Vec<f64> {
    let n = p.ngrid();
    let length = p.x2() - p.x1();
    let last = (n - 1) as f64;

    (0..n)
        .map(|i| p.x1() + (i as f64 * length) / last)
        .collect()
}

/// Symmetric triangle over the middle half of the domain, peak
/// [`PULSE_PEAK`] at the midpoint, exactly zero elsewhere.
pub fn triangle_pulse(p: &DerivedParams, x: &[f64]) -> Vec<f64> {
    let length = p.x2() - p.x1();
    let xstart = p.x1() + 0.25 * length;
    let xmid = 0.5 * (p.x1() + p.x2());
    let xfinish = p.x1() + 0.75 * length;

    x.iter()
        .map(|&xi| {
            if xi < xstart || xi > xfinish {
                0.0
            } else {
                PULSE_PEAK - (xi - xmid).abs() / length
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveParams;

    fn params(x1: f64, x2: f64, dx: f64) -> DerivedParams {
        WaveParams {
            c: 1.0,
            tau: 1.0,
            x1,
            x2,
            runtime: 0.0,
            dx,
            outtime: 1.0,
            outfilename: "ic.dat".into(),
        }
        .derive()
        .unwrap()
    }

    #[test]
    fn grid_spans_domain() {
        let p = params(-2.0, 3.0, 0.07);
        let x = grid(&p);
        assert_eq!(x.len(), p.ngrid());
        assert_eq!(x[0], -2.0);
        assert!((x[x.len() - 1] - 3.0).abs() < 1e-12);
        assert!(x.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn two_point_grid() {
        let p = params(0.0, 1.0, 0.5);
        assert_eq!(grid(&p), vec![0.0, 1.0]);
    }

    #[test]
    fn pulse_on_aligned_grid() {
        // 9 points over [0, 9]: x = 0, 1.125, 2.25, ..., 9
        let p = params(0.0, 9.0, 1.0);
        let x = grid(&p);
        let rho = triangle_pulse(&p, &x);

        assert_eq!(rho.len(), 9);
        assert_eq!(rho[4], 0.25);
        assert_eq!(rho[3], 0.125);
        assert_eq!(rho[5], 0.125);
        // edges of the support land exactly on zero
        assert_eq!(rho[2], 0.0);
        assert_eq!(rho[6], 0.0);
        for i in [0, 1, 7, 8] {
            assert_eq!(rho[i], 0.0, "index {i}");
        }
    }

    #[test]
    fn pulse_is_zero_outside_middle_half() {
        let p = params(1.0, 4.0, 0.01);
        let x = grid(&p);
        let rho = triangle_pulse(&p, &x);

        for (&xi, &r) in x.iter().zip(&rho) {
            if xi < 1.75 || xi > 3.25 {
                assert_eq!(r, 0.0, "x = {xi}");
            } else {
                assert!((0.0..=PULSE_PEAK).contains(&r), "x = {xi}, rho = {r}");
            }
        }
    }

    #[test]
    fn pulse_does_not_touch_coordinates() {
        let p = params(0.0, 1.0, 0.1);
        let x = grid(&p);
        let before = x.clone();
        let _ = triangle_pulse(&p, &x);
        assert_eq!(x, before);
    }
}
