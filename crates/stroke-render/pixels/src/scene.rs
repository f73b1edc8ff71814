use std::cell::RefCell;
use std::rc::Rc;

use stroke_graphics::{Brush, Color, Point, Rect, StrokeStyle};
use stroke_render_common::{HitTestTarget, PointerEventKind, RenderScene};

pub(crate) struct StrokeItem {
    pub contours: Vec<Vec<Point>>,
    pub brush: Brush,
    pub style: StrokeStyle,
    /// Horizontal extent the gradient spans, in scene coordinates. Fixed to
    /// the full glyph bounds so the gradient does not slide as the trim
    /// range grows.
    pub gradient_span: (f32, f32),
}

pub(crate) struct RectItem {
    pub rect: Rect,
    pub color: Color,
}

struct HitRegion {
    rect: Rect,
    action: Rc<RefCell<dyn FnMut()>>,
}

/// Retained CPU scene: draw items in painter's order plus hit regions.
pub struct Scene {
    background: Color,
    strokes: Vec<StrokeItem>,
    rects: Vec<RectItem>,
    hits: Vec<HitRegion>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: Color::rgb(0.02, 0.02, 0.04),
            strokes: Vec::new(),
            rects: Vec::new(),
            hits: Vec::new(),
        }
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn push_stroke(
        &mut self,
        contours: Vec<Vec<Point>>,
        brush: Brush,
        style: StrokeStyle,
        gradient_span: (f32, f32),
    ) {
        self.strokes.push(StrokeItem {
            contours,
            brush,
            style,
            gradient_span,
        });
    }

    pub fn push_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push(RectItem { rect, color });
    }

    pub fn push_hit(&mut self, rect: Rect, action: Rc<RefCell<dyn FnMut()>>) {
        self.hits.push(HitRegion { rect, action });
    }

    pub(crate) fn strokes(&self) -> &[StrokeItem] {
        &self.strokes
    }

    pub(crate) fn rects(&self) -> &[RectItem] {
        &self.rects
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScene for Scene {
    type HitTarget = SceneHitTarget;

    fn clear(&mut self) {
        self.strokes.clear();
        self.rects.clear();
        self.hits.clear();
    }

    fn hit_test(&self, x: f32, y: f32) -> Option<Self::HitTarget> {
        // Topmost region wins.
        self.hits
            .iter()
            .rev()
            .find(|region| region.rect.contains(x, y))
            .map(|region| SceneHitTarget {
                action: Rc::clone(&region.action),
            })
    }
}

/// Hit target that fires its action on pointer down.
pub struct SceneHitTarget {
    action: Rc<RefCell<dyn FnMut()>>,
}

impl HitTestTarget for SceneHitTarget {
    fn dispatch(&self, kind: PointerEventKind, _x: f32, _y: f32) {
        if kind == PointerEventKind::Down {
            (self.action.borrow_mut())();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_prefers_the_topmost_region() {
        let mut scene = Scene::new();
        let first = Rc::new(RefCell::new(0u32));
        let second = Rc::new(RefCell::new(0u32));

        {
            let first = first.clone();
            scene.push_hit(
                Rect::new(0.0, 0.0, 100.0, 100.0),
                Rc::new(RefCell::new(move || *first.borrow_mut() += 1)),
            );
        }
        {
            let second = second.clone();
            scene.push_hit(
                Rect::new(25.0, 25.0, 50.0, 50.0),
                Rc::new(RefCell::new(move || *second.borrow_mut() += 1)),
            );
        }

        let target = scene.hit_test(50.0, 50.0).expect("inside both regions");
        target.dispatch(PointerEventKind::Down, 50.0, 50.0);
        assert_eq!((*first.borrow(), *second.borrow()), (0, 1));

        let target = scene.hit_test(10.0, 10.0).expect("inside outer region");
        target.dispatch(PointerEventKind::Down, 10.0, 10.0);
        assert_eq!((*first.borrow(), *second.borrow()), (1, 1));
    }

    #[test]
    fn only_pointer_down_fires_the_action() {
        let mut scene = Scene::new();
        let count = Rc::new(RefCell::new(0u32));
        {
            let count = count.clone();
            scene.push_hit(
                Rect::new(0.0, 0.0, 10.0, 10.0),
                Rc::new(RefCell::new(move || *count.borrow_mut() += 1)),
            );
        }

        let target = scene.hit_test(5.0, 5.0).expect("inside region");
        target.dispatch(PointerEventKind::Move, 5.0, 5.0);
        target.dispatch(PointerEventKind::Up, 5.0, 5.0);
        assert_eq!(*count.borrow(), 0);

        target.dispatch(PointerEventKind::Down, 5.0, 5.0);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn clear_drops_items_and_regions() {
        let mut scene = Scene::new();
        scene.push_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::WHITE);
        scene.push_hit(Rect::new(0.0, 0.0, 5.0, 5.0), Rc::new(RefCell::new(|| {})));

        scene.clear();

        assert!(scene.hit_test(2.0, 2.0).is_none());
        assert!(scene.rects().is_empty());
        assert!(scene.strokes().is_empty());
    }
}
