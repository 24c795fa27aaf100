use slotmap::SlotMap;

use crate::api::types::BodyHandle;
use crate::components::body::Body;
use crate::components::kind::BodyKind;
use crate::renderer::instance::{DrawBuffer, DrawInstance};

/// Run `Body::draw` on each body in `order` and record one instance per body.
pub fn build_draw_buffer(
    bodies: &mut SlotMap<BodyHandle, Body>,
    order: &[BodyHandle],
    interpolation: f32,
    buffer: &mut DrawBuffer,
) {
    buffer.clear();
    for handle in order {
        let Some(body) = bodies.get_mut(*handle) else { continue };
        body.draw(interpolation);
        buffer.push(instance_for(body));
    }
}

fn instance_for(body: &Body) -> DrawInstance {
    let (origin, extent) = match body.kind() {
        BodyKind::Line { a, b } => (*a * body.scale(), *b - *a),
        _ => (body.draw_pos(), body.size()),
    };

    let mut flags = 0;
    if body.is_interacting() {
        flags |= DrawInstance::FLAG_INTERACTING;
    }
    if body.is_intersecting() {
        flags |= DrawInstance::FLAG_INTERSECTING;
    }
    if body.is_static() {
        flags |= DrawInstance::FLAG_STATIC;
    }

    DrawInstance {
        x: origin.x as f32,
        y: origin.y as f32,
        rotation: body.rotation() as f32,
        width: extent.x as f32,
        height: extent.y as f32,
        scale: body.scale() as f32,
        kind: body.kind().code() as f32,
        flags: flags as f32,
    }
}
