//! Macros to reduce boilerplate in layer implementations

/// Implements the property-backed accessors of `LayerTrait`:
/// id, name, layer type, opacity and visibility.
///
/// The implementing module must have `LayerType` in scope.
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer_type:ty, $properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn layer_type(&self) -> LayerType {
            self.$properties_field.layer_type
        }

        fn opacity(&self) -> f32 {
            self.$properties_field.opacity
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }
    };
}
