//! Stroke command set for synthesized edge frames

use crate::sampling::FrameSampler;
use crate::{Dimensions, SceneConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCommand {
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
    },
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Sample one frame's worth of shapes: circles, then segments, then rectangles.
/// Positions are uniform over `canvas`; shapes may run off its edges.
pub fn edge_scene(sampler: &mut FrameSampler, canvas: Dimensions, scene: &SceneConfig) -> Vec<StrokeCommand> {
    let mut commands = Vec::with_capacity(scene.circles + scene.lines + scene.rectangles);

    for _ in 0..scene.circles {
        let cx = sampler.coordinate(canvas.width);
        let cy = sampler.coordinate(canvas.height);
        let radius = sampler.extent(scene.radius);
        commands.push(StrokeCommand::Circle { cx, cy, radius });
    }

    for _ in 0..scene.lines {
        let x0 = sampler.coordinate(canvas.width);
        let y0 = sampler.coordinate(canvas.height);
        let x1 = sampler.coordinate(canvas.width);
        let y1 = sampler.coordinate(canvas.height);
        commands.push(StrokeCommand::Line { x0, y0, x1, y1 });
    }

    for _ in 0..scene.rectangles {
        let x = sampler.coordinate(canvas.width);
        let y = sampler.coordinate(canvas.height);
        let width = sampler.extent(scene.rect_extent);
        let height = sampler.extent(scene.rect_extent);
        commands.push(StrokeCommand::Rect { x, y, width, height });
    }

    commands
}
