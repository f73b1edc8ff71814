use crate::color::Color;

/// A color stop at a position in [0, 1] along the gradient axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Color,
}

/// Paint description for filling stroked geometry.
///
/// Gradients run left to right across the painted geometry's horizontal
/// extent; `sample` maps a horizontal fraction to a color.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Color),
    LinearGradient { stops: Vec<GradientStop> },
}

impl Brush {
    pub fn solid(color: Color) -> Self {
        Brush::Solid(color)
    }

    /// Evenly spaced gradient over the given colors.
    pub fn linear_gradient(colors: &[Color]) -> Self {
        match colors {
            [] => Brush::Solid(Color::TRANSPARENT),
            [only] => Brush::Solid(*only),
            _ => {
                let last = (colors.len() - 1) as f32;
                let stops = colors
                    .iter()
                    .enumerate()
                    .map(|(index, color)| GradientStop {
                        position: index as f32 / last,
                        color: *color,
                    })
                    .collect();
                Brush::LinearGradient { stops }
            }
        }
    }

    pub fn with_stops(stops: Vec<GradientStop>) -> Self {
        Brush::LinearGradient { stops }
    }

    /// Color at `fraction` in [0, 1] along the gradient axis.
    pub fn sample(&self, fraction: f32) -> Color {
        match self {
            Brush::Solid(color) => *color,
            Brush::LinearGradient { stops } => {
                if stops.is_empty() {
                    return Color::TRANSPARENT;
                }
                let t = fraction.clamp(0.0, 1.0);
                if t <= stops[0].position {
                    return stops[0].color;
                }
                for pair in stops.windows(2) {
                    let [a, b] = [pair[0], pair[1]];
                    if t <= b.position {
                        let span = b.position - a.position;
                        if span <= f32::EPSILON {
                            return b.color;
                        }
                        return a.color.lerp(b.color, (t - a.position) / span);
                    }
                }
                stops[stops.len() - 1].color
            }
        }
    }
}
