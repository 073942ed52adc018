use crate::error::ValidationError;
use crate::spec::document::{OpenApiDocument, OperationSpec, ParameterSpec, ReferenceOr};

/// Resolves document-level `$ref`s to the objects they point at.
///
/// Only structural references are handled here, such as a parameter written as
/// `$ref: "#/parameters/PageLimit"`. References inside JSON schemas
/// (`#/definitions/...`) are left to the schema validator, which sees the
/// document's `definitions` merged into every body schema.
pub trait ResolveReference<T> {
    fn resolve<'a>(&'a self, document: &'a OpenApiDocument) -> Result<&'a T, ValidationError>;
}

const PARAMETER_PREFIX: &str = "#/parameters/";

impl ResolveReference<ParameterSpec> for ReferenceOr<ParameterSpec> {
    fn resolve<'a>(
        &'a self,
        document: &'a OpenApiDocument,
    ) -> Result<&'a ParameterSpec, ValidationError> {
        match self {
            ReferenceOr::Item(item) => Ok(item),
            ReferenceOr::Reference { reference } => {
                let name = reference.strip_prefix(PARAMETER_PREFIX).ok_or_else(|| {
                    ValidationError::SchemaNotFound(format!(
                        "Invalid reference: {}. Expected prefix: {}",
                        reference, PARAMETER_PREFIX
                    ))
                })?;

                document.parameters.get(name).ok_or_else(|| {
                    ValidationError::SchemaNotFound(format!("Reference not found: {}", reference))
                })
            }
        }
    }
}

impl OperationSpec {
    /// Parameters in declaration order with references resolved.
    pub fn resolved_parameters<'a>(
        &'a self,
        document: &'a OpenApiDocument,
    ) -> Result<Vec<&'a ParameterSpec>, ValidationError> {
        self.parameters
            .iter()
            .map(|parameter| parameter.resolve(document))
            .collect()
    }
}
