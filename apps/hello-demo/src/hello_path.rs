//! The "Hello" glyph geometry.
//!
//! A single continuous cursive stroke in a fixed 320x180 design box
//! (16:9, y down). The path is parametrized once; the reveal animation only
//! ever changes the trim fraction applied to it.

use stroke_graphics::{Path, Size};

pub const DESIGN_SIZE: Size = Size {
    width: 320.0,
    height: 180.0,
};

/// Builds the cursive "Hello" stroke.
pub fn hello_path() -> Path {
    let mut path = Path::new();
    path
        // H: tall up-stroke, crest, back down with a foot hook...
        .move_to(22.0, 128.0)
        .cubic_to(34.0, 92.0, 46.0, 52.0, 54.0, 42.0)
        .cubic_to(60.0, 36.0, 62.0, 42.0, 58.0, 54.0)
        .cubic_to(50.0, 78.0, 42.0, 106.0, 38.0, 126.0)
        .cubic_to(36.0, 136.0, 40.0, 138.0, 44.0, 130.0)
        // ...then the crossbar sweeping into the second leg.
        .cubic_to(50.0, 108.0, 64.0, 92.0, 76.0, 92.0)
        .cubic_to(88.0, 92.0, 92.0, 104.0, 86.0, 116.0)
        // e: small loop with an exit to the right.
        .cubic_to(82.0, 124.0, 88.0, 130.0, 96.0, 126.0)
        .cubic_to(102.0, 122.0, 108.0, 112.0, 102.0, 106.0)
        .cubic_to(96.0, 100.0, 86.0, 108.0, 90.0, 118.0)
        .cubic_to(94.0, 128.0, 106.0, 130.0, 114.0, 124.0)
        // first l: tall loop.
        .cubic_to(124.0, 114.0, 136.0, 84.0, 142.0, 58.0)
        .cubic_to(146.0, 44.0, 150.0, 44.0, 150.0, 56.0)
        .cubic_to(150.0, 76.0, 140.0, 108.0, 132.0, 126.0)
        .cubic_to(128.0, 134.0, 134.0, 136.0, 140.0, 128.0)
        // second l.
        .cubic_to(148.0, 112.0, 160.0, 84.0, 166.0, 58.0)
        .cubic_to(170.0, 44.0, 174.0, 44.0, 174.0, 56.0)
        .cubic_to(174.0, 76.0, 164.0, 108.0, 156.0, 126.0)
        .cubic_to(152.0, 134.0, 158.0, 136.0, 166.0, 128.0)
        // o: round loop with a closing flick.
        .cubic_to(174.0, 118.0, 184.0, 108.0, 192.0, 108.0)
        .cubic_to(202.0, 108.0, 206.0, 118.0, 200.0, 126.0)
        .cubic_to(194.0, 134.0, 182.0, 132.0, 184.0, 122.0)
        .cubic_to(186.0, 114.0, 196.0, 112.0, 204.0, 116.0)
        .cubic_to(212.0, 120.0, 220.0, 118.0, 226.0, 112.0);
    path
}

#[cfg(test)]
mod tests {
    use stroke_graphics::PathMeasure;

    use super::*;

    #[test]
    fn glyph_is_one_continuous_stroke() {
        let measure = PathMeasure::new(&hello_path());
        assert_eq!(measure.contours().len(), 1);
        assert!(measure.length() > 0.0);
    }

    #[test]
    fn glyph_stays_inside_the_design_box() {
        let measure = PathMeasure::new(&hello_path());
        let bounds = measure.bounds();
        assert!(bounds.x >= 0.0 && bounds.y >= 0.0);
        assert!(bounds.right() <= DESIGN_SIZE.width);
        assert!(bounds.bottom() <= DESIGN_SIZE.height);
    }
}
