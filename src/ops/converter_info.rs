//! A pending conversion between two build objects.

use std::cell::OnceCell;

use crate::catalog::{Catalog, ConversionError, ConversionRequest, ConverterDescriptor};
use crate::core::{BuildObject, Model, ResourceId};

/// Conversion of `from` into an object shaped like `to`, run at most once.
#[derive(Debug)]
pub struct ConverterInfo {
    request: ConversionRequest,
    descriptor: ConverterDescriptor,
    converted: OnceCell<Result<BuildObject, ConversionError>>,
}

impl ConverterInfo {
    /// Create a pending conversion for `resource`.
    pub fn new(
        resource: ResourceId,
        from: BuildObject,
        to: BuildObject,
        descriptor: ConverterDescriptor,
    ) -> Self {
        ConverterInfo {
            request: ConversionRequest { from, to, resource },
            descriptor,
            converted: OnceCell::new(),
        }
    }

    /// The object being converted.
    pub fn from(&self) -> BuildObject {
        self.request.from
    }

    /// The definition the result is shaped like.
    pub fn to(&self) -> BuildObject {
        self.request.to
    }

    /// Resource the result is attached to.
    pub fn resource(&self) -> ResourceId {
        self.request.resource
    }

    /// The converter that will run.
    pub fn descriptor(&self) -> &ConverterDescriptor {
        &self.descriptor
    }

    /// Whether the conversion already ran.
    pub fn is_converted(&self) -> bool {
        self.converted.get().is_some()
    }

    /// Run the conversion on first call; later calls return the first result
    /// without touching the model again.
    pub fn converted(
        &self,
        model: &mut Model,
        catalog: &Catalog,
    ) -> &Result<BuildObject, ConversionError> {
        self.converted.get_or_init(|| {
            let result = self.descriptor.execute(model, catalog, &self.request);
            if let Err(err) = &result {
                tracing::warn!("{}", err);
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gnu_project, MockConverter};

    #[test]
    fn test_conversion_runs_once() {
        let fixture = gnu_project();
        let mut model = fixture.model;
        let catalog = fixture.catalog;

        let converter = MockConverter::instantiating();
        let info = ConverterInfo::new(
            fixture.root,
            BuildObject::Tool(fixture.root_gcc),
            BuildObject::Tool(fixture.clang),
            converter.descriptor("count"),
        );
        assert!(!info.is_converted());

        let first = info.converted(&mut model, &catalog).clone().unwrap();
        let second = info.converted(&mut model, &catalog).clone().unwrap();
        assert_eq!(first, second);
        assert!(info.is_converted());
        assert_eq!(converter.runs(), 1);
        assert_eq!(model.tool(first.as_tool().unwrap()).superclass(), Some(fixture.clang));
    }

    #[test]
    fn test_failed_conversion_is_remembered() {
        let fixture = gnu_project();
        let mut model = fixture.model;
        let catalog = fixture.catalog;

        let converter = MockConverter::failing("unsupported option");
        let info = ConverterInfo::new(
            fixture.root,
            BuildObject::Tool(fixture.root_gcc),
            BuildObject::Tool(fixture.clang),
            converter.descriptor("broken"),
        );
        assert!(info.converted(&mut model, &catalog).is_err());
        assert!(info.converted(&mut model, &catalog).is_err());
        assert_eq!(converter.runs(), 1);
    }
}
