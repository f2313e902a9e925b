//! Synthetic type graphs for benchmarks

use mapkit::errors::MappingResult;
use mapkit::metadata::{PropertyDescriptor, TypeDescriptor, TypeRef};
use mapkit::MappingContext;

/// Name of the root type of every generated graph.
pub const ROOT_TYPE: &str = "Level0";

fn level_name(level: usize) -> String {
    format!("Level{}", level)
}

/// Builds a context holding a linear chain of `depth` types.
///
/// Every level declares `width` scalar filler properties and `value`. All
/// but the last level also declare a `child` link to the next level and a
/// `children` collection of it.
pub fn chain_context(depth: usize, width: usize, cache_enabled: bool) -> MappingResult<MappingContext> {
    let mut builder = MappingContext::builder()
        .cache_enabled(cache_enabled)
        .max_segments(depth.max(1) * 4 + 16);

    for level in 0..=depth {
        let mut descriptor = TypeDescriptor::builder(&level_name(level));
        for i in 0..width {
            descriptor = descriptor.property(PropertyDescriptor::new(
                &format!("field{}", i),
                TypeRef::named("String"),
            ));
        }

        descriptor = descriptor.property(PropertyDescriptor::new("value", TypeRef::named("String")));
        if level < depth {
            let next = TypeRef::named(&level_name(level + 1));
            descriptor = descriptor
                .property(PropertyDescriptor::new("child", next.clone()))
                .property(PropertyDescriptor::new("children", TypeRef::collection(next)).association());
        }
        builder = builder.descriptor(descriptor.build());
    }

    let context = builder.build()?;
    log::debug!("Generated chain of {} types", context.registry().len());
    Ok(context)
}

/// `childChild...Value` reaching the leaf of a chain of `depth` levels.
pub fn camel_case_path(depth: usize) -> String {
    let mut path = String::from("child");
    for _ in 1..depth {
        path.push_str("Child");
    }
    path.push_str("Value");
    path
}

/// `child.child. ... .value` reaching the leaf of a chain of `depth` levels.
pub fn dotted_path(depth: usize) -> String {
    let mut segments = vec!["child"; depth];
    segments.push("value");
    segments.join(".")
}

/// `children_children_..._value`, one collection hop per level.
pub fn separated_collection_path(depth: usize) -> String {
    let mut segments = vec!["children"; depth];
    segments.push("value");
    segments.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_paths_resolve() {
        let context = chain_context(5, 3, true).unwrap();
        let root = TypeRef::named(ROOT_TYPE);

        let camel = context.resolve_path(&camel_case_path(5), &root).unwrap();
        let dotted = context.resolve_path(&dotted_path(5), &root).unwrap();
        assert_eq!(camel, dotted);
        assert_eq!(camel.len(), 6);

        let collections = context
            .resolve_path(&separated_collection_path(5), &root)
            .unwrap();
        assert!(collections.is_collection());
        assert_eq!(collections.len(), 6);
    }
}
