//! Scene graph validation
//!
//! The [`GraphValidator`] audits a [`SceneGraph`] against its attachment rules:
//! renderer registration matches visibility, each visible object sits in
//! exactly one container on a live display, frame parents share the child's
//! display, and no frame chain loops. A graph driven only through
//! `SceneGraph` operations always validates; this is for tests and debug
//! builds of tools.

use std::collections::HashMap;

use crate::display::DisplayKey;
use crate::graph::SceneGraph;
use crate::object::ObjectKey;
use crate::renderer::Renderer;

/// Invariant violation found in a scene graph
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    /// Renderer registration disagrees with the visible flag
    RegistrationMismatch {
        object: ObjectKey,
        visible: bool,
        registered: bool,
    },
    /// Object appears in the wrong number of containers
    ContainerCount {
        object: ObjectKey,
        expected: usize,
        found: usize,
    },
    /// Visible object is not in the container its attachment names
    WrongContainer(ObjectKey),
    /// Frame reference points at a missing object or a non-frame
    BadFrame { object: ObjectKey, frame: ObjectKey },
    /// Object and its frame are on different displays
    CrossDisplay {
        object: ObjectKey,
        display: Option<DisplayKey>,
        frame_display: Option<DisplayKey>,
    },
    /// Visible object is on no display
    Detached(ObjectKey),
    /// Object's frame chain loops back on itself
    Cycle(ObjectKey),
    /// A container lists a key that is not a live object
    Dangling(ObjectKey),
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::RegistrationMismatch { object, visible, registered } => write!(
                f,
                "{:?} has visible={} but registered={}",
                object, visible, registered
            ),
            InvariantViolation::ContainerCount { object, expected, found } => write!(
                f,
                "{:?} is in {} containers, expected {}",
                object, found, expected
            ),
            InvariantViolation::WrongContainer(object) => {
                write!(f, "{:?} is not in the container its attachment names", object)
            }
            InvariantViolation::BadFrame { object, frame } => {
                write!(f, "{:?} names {:?} as frame, which is not a live frame", object, frame)
            }
            InvariantViolation::CrossDisplay { object, display, frame_display } => write!(
                f,
                "{:?} is on display {:?} but its frame is on {:?}",
                object, display, frame_display
            ),
            InvariantViolation::Detached(object) => {
                write!(f, "{:?} is visible but on no display", object)
            }
            InvariantViolation::Cycle(object) => {
                write!(f, "Frame chain of {:?} loops", object)
            }
            InvariantViolation::Dangling(object) => {
                write!(f, "Container lists missing object {:?}", object)
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Audits scene graphs for broken attachment invariants
pub struct GraphValidator;

impl GraphValidator {
    /// Validate a graph, returning every violation found
    pub fn validate<R: Renderer>(graph: &SceneGraph<R>) -> Vec<InvariantViolation> {
        let mut errors = Vec::new();

        // How many containers list each key
        let mut membership: HashMap<ObjectKey, usize> = HashMap::new();
        for (_, display) in graph.displays() {
            for &k in display.roots() {
                *membership.entry(k).or_default() += 1;
            }
        }
        for (_, obj) in graph.iter() {
            for &k in obj.children() {
                *membership.entry(k).or_default() += 1;
            }
        }
        for &k in membership.keys() {
            if !graph.contains(k) {
                errors.push(InvariantViolation::Dangling(k));
            }
        }

        for (key, obj) in graph.iter() {
            let registered = graph.renderer().is_registered(key);
            if registered != obj.visible() {
                errors.push(InvariantViolation::RegistrationMismatch {
                    object: key,
                    visible: obj.visible(),
                    registered,
                });
            }

            let found = membership.get(&key).copied().unwrap_or(0);
            let expected = usize::from(obj.visible());
            if found != expected {
                errors.push(InvariantViolation::ContainerCount { object: key, expected, found });
            } else if obj.visible() {
                let in_place = match obj.frame() {
                    Some(f) => graph.children(f).contains(&key),
                    None => obj
                        .display()
                        .and_then(|d| graph.display(d))
                        .is_some_and(|d| d.contains_root(key)),
                };
                if !in_place {
                    errors.push(InvariantViolation::WrongContainer(key));
                }
            }

            if obj.visible() && obj.display().is_none() {
                errors.push(InvariantViolation::Detached(key));
            }

            if let Some(f) = obj.frame() {
                match graph.get(f) {
                    Some(frame) if frame.is_frame() => {
                        if frame.display() != obj.display() {
                            errors.push(InvariantViolation::CrossDisplay {
                                object: key,
                                display: obj.display(),
                                frame_display: frame.display(),
                            });
                        }
                    }
                    _ => errors.push(InvariantViolation::BadFrame { object: key, frame: f }),
                }
            }

            let chain = graph.ancestors(key);
            let loops = chain.contains(&key)
                || chain
                    .last()
                    .and_then(|&root| graph.get(root))
                    .and_then(|root| root.frame())
                    .is_some_and(|f| graph.contains(f));
            if loops {
                errors.push(InvariantViolation::Cycle(key));
            }
        }

        errors
    }

    /// Validate and return Result (Ok if no violations, Err with all of them)
    pub fn validate_or_error<R: Renderer>(graph: &SceneGraph<R>) -> Result<(), Vec<InvariantViolation>> {
        let errors = Self::validate(graph);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl<R: Renderer> SceneGraph<R> {
    /// Audit this graph; see [`GraphValidator::validate`]
    pub fn validate(&self) -> Vec<InvariantViolation> {
        GraphValidator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplaySettings;
    use crate::object::ObjectKey;
    use crate::shapes::ShapeTemplate;
    use crate::template::{Attachment, ObjectTemplate};

    /// Renderer that forgets everything, to provoke registration mismatches
    #[derive(Default)]
    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn register(&mut self, _key: ObjectKey) {}
        fn unregister(&mut self, _key: ObjectKey) {}
        fn is_registered(&self, _key: ObjectKey) -> bool {
            false
        }
    }

    #[test]
    fn test_empty_graph_is_valid() {
        let graph = SceneGraph::new();
        assert!(GraphValidator::validate_or_error(&graph).is_ok());
    }

    #[test]
    fn test_nested_graph_is_valid() {
        let mut graph = SceneGraph::new();
        graph.add_display(DisplaySettings::default());
        let f = graph.spawn(Attachment::new(), ObjectTemplate::new(ShapeTemplate::frame())).unwrap();
        let g = graph.spawn(Attachment::in_frame(f), ObjectTemplate::new(ShapeTemplate::frame())).unwrap();
        graph
            .spawn(Attachment::in_frame(g), ObjectTemplate::new(ShapeTemplate::sphere(1.0)))
            .unwrap();
        graph
            .spawn(Attachment::in_frame(g).hidden(), ObjectTemplate::new(ShapeTemplate::sphere(1.0)))
            .unwrap();

        let errors = graph.validate();
        assert!(errors.is_empty(), "Expected no violations, got: {:?}", errors);
    }

    #[test]
    fn test_registration_mismatch_detected() {
        let mut graph = SceneGraph::with_renderer(NullRenderer);
        graph.add_display(DisplaySettings::default());
        let o = graph
            .spawn(Attachment::new(), ObjectTemplate::new(ShapeTemplate::sphere(1.0)))
            .unwrap();

        let errors = GraphValidator::validate(&graph);
        assert_eq!(
            errors,
            vec![InvariantViolation::RegistrationMismatch { object: o, visible: true, registered: false }]
        );
    }

    #[test]
    fn test_violation_display() {
        let mut keys: slotmap::SlotMap<ObjectKey, ()> = slotmap::SlotMap::with_key();
        let k = keys.insert(());
        let msg = format!(
            "{}",
            InvariantViolation::ContainerCount { object: k, expected: 1, found: 2 }
        );
        assert!(msg.contains("2 containers, expected 1"));
        assert!(format!("{}", InvariantViolation::Cycle(k)).contains("loops"));
        assert!(format!("{}", InvariantViolation::Detached(k)).contains("no display"));
    }
}
