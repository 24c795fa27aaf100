use bytemuck::{Pod, Zeroable};

/// One body as seen by the host renderer: 8 floats, 32-byte stride.
///
/// For `Line` bodies `x, y` is the first endpoint and `width, height` is the
/// signed offset to the second.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    /// Interpolated, scaled top-left corner.
    pub x: f32,
    pub y: f32,
    /// Radians in `[0, 2π)`.
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// `BodyKind::code`.
    pub kind: f32,
    /// Bit set of `FLAG_*`.
    pub flags: f32,
}

impl DrawInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_INTERACTING: u32 = 1;
    pub const FLAG_INTERSECTING: u32 = 1 << 1;
    pub const FLAG_STATIC: u32 = 1 << 2;

    pub fn flag_bits(&self) -> u32 {
        self.flags as u32
    }
}

/// Draw list rebuilt every frame, in registry order.
#[derive(Debug, Default)]
pub struct DrawBuffer {
    instances: Vec<DrawInstance>,
}

impl DrawBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: DrawInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[DrawInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Flat float view for hosts that read the buffer directly.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to the float view, for wasm memory reads.
    pub fn as_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }
}
