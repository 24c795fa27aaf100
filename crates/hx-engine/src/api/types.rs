use slotmap::new_key_type;

new_key_type! {
    /// Generation-checked handle to a body stored in a `World`.
    ///
    /// A handle outlives the body it names: once the body is despawned the
    /// handle resolves to nothing, even if its slot is reused.
    pub struct BodyHandle;
}
