use rwmap_index::{ConstraintTemplate, ManpageIndex, ManpageVariant};

use crate::error::RwmapError;
use crate::patterns::Alias;

pub const DEFAULT_SERVING_EXTENSION: &str = ".html";

/// Resolves `alias` to the serving path of the index's best matching variant.
///
/// Narrowing runs without an accept-language preference and with an empty
/// hint, so the target only depends on the alias itself.
pub fn resolve_alias<I: ManpageIndex + ?Sized>(
    index: &I,
    name: &str,
    variants: &[ManpageVariant],
    alias: &Alias<'_>,
    extension: &str,
) -> Result<String, RwmapError> {
    let hint = ConstraintTemplate::default();
    let narrowed = index.narrow("", &alias.template, &hint, variants);
    let Some(best) = narrowed.first() else {
        return Err(RwmapError::NoMatch {
            name: name.to_string(),
            key: alias.key.clone(),
            template: alias.template.to_string(),
        });
    };
    Ok(best.serving_path(extension))
}
