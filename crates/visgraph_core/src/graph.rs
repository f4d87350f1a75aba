//! Scene graph attachment manager
//!
//! The SceneGraph owns every renderable and display and enforces the
//! attachment rules between them:
//!
//! - a visible object sits in exactly one container: its frame's child set
//!   when it has a frame, otherwise its display's root set
//! - a hidden object sits in no container
//! - an object is registered with the renderer exactly while it is visible
//!   (or, for a detached object, never)
//! - a frame-owned object shares its frame's display
//! - a visible object is on a display
//! - the frame parent chain never loops
//!
//! Every operation validates first and mutates second, so a returned error
//! leaves the graph untouched.

use slotmap::SlotMap;

use crate::display::{Display, DisplayKey, DisplaySettings};
use crate::error::{ConfigurationError, CycleError, InvalidTransitionError, SceneError};
use crate::object::{ObjectKey, Renderable};
use crate::renderer::{RenderSet, Renderer};
use crate::shapes::Capabilities;
use crate::template::{Attachment, ObjectTemplate};
use crate::transform::Transform3D;

/// Log a rejected operation and pass the result through
fn logged<T>(op: &str, result: Result<T, SceneError>) -> Result<T, SceneError> {
    if let Err(ref e) = result {
        log::warn!("{} rejected: {}", op, e);
    }
    result
}

/// Container for all renderables and displays
pub struct SceneGraph<R: Renderer = RenderSet> {
    objects: SlotMap<ObjectKey, Renderable>,
    displays: SlotMap<DisplayKey, Display>,
    selected: Option<DisplayKey>,
    renderer: R,
}

impl Default for SceneGraph<RenderSet> {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph<RenderSet> {
    /// Create an empty scene graph drawing into a [`RenderSet`]
    pub fn new() -> Self {
        Self::with_renderer(RenderSet::new())
    }
}

impl<R: Renderer> SceneGraph<R> {
    /// Create an empty scene graph drawing into `renderer`
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            objects: SlotMap::with_key(),
            displays: SlotMap::with_key(),
            selected: None,
            renderer,
        }
    }

    /// The renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    // --- Displays ---

    /// Add a display; the first display added becomes the selected one
    pub fn add_display(&mut self, settings: DisplaySettings) -> DisplayKey {
        let key = self.displays.insert(Display::new(settings));
        if self.selected.is_none() {
            self.selected = Some(key);
        }
        log::debug!("Added display {:?}", key);
        key
    }

    /// Make `key` the display used by spawns that name neither display nor frame
    pub fn select_display(&mut self, key: DisplayKey) -> Result<(), SceneError> {
        if !self.displays.contains_key(key) {
            return logged("select_display", Err(ConfigurationError::UnknownDisplay(key).into()));
        }
        self.selected = Some(key);
        Ok(())
    }

    /// The selected display
    pub fn selected_display(&self) -> Option<DisplayKey> {
        self.selected
    }

    /// Get a display by key
    pub fn display(&self, key: DisplayKey) -> Option<&Display> {
        self.displays.get(key)
    }

    /// Iterate over all displays
    pub fn displays(&self) -> impl Iterator<Item = (DisplayKey, &Display)> {
        self.displays.iter()
    }

    /// Remove a display
    ///
    /// Every object on it is hidden (unregistering the visible ones) and left
    /// without a display. Frame relations between those objects are kept, so
    /// moving a root back onto a display brings its subtree along.
    pub fn remove_display(&mut self, key: DisplayKey) -> Result<Display, SceneError> {
        if !self.displays.contains_key(key) {
            return logged("remove_display", Err(ConfigurationError::UnknownDisplay(key).into()));
        }

        let affected: Vec<ObjectKey> = self
            .objects
            .iter()
            .filter(|(_, obj)| obj.display() == Some(key))
            .map(|(k, _)| k)
            .collect();

        for &k in &affected {
            let (frame, visible) = {
                let obj = &self.objects[k];
                (obj.frame(), obj.visible())
            };
            if visible {
                self.leave_container(k, Some(key), frame);
                self.renderer.unregister(k);
            }
            let obj = &mut self.objects[k];
            obj.set_visible_flag(false);
            obj.set_display_ref(None);
        }

        let display = self
            .displays
            .remove(key)
            .ok_or(ConfigurationError::UnknownDisplay(key))?;
        if self.selected == Some(key) {
            self.selected = self.displays.keys().next();
        }
        log::debug!("Removed display {:?}, detached {} objects", key, affected.len());
        Ok(display)
    }

    // --- Objects ---

    /// Get an object by key
    pub fn get(&self, key: ObjectKey) -> Option<&Renderable> {
        self.objects.get(key)
    }

    /// Get a mutable object by key
    ///
    /// Attachment state is not reachable through this reference; use
    /// [`set_display`](Self::set_display), [`set_frame`](Self::set_frame) and
    /// [`set_visible`](Self::set_visible).
    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut Renderable> {
        self.objects.get_mut(key)
    }

    /// Check whether `key` refers to a live object
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Find the first object with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(ObjectKey, &Renderable)> {
        self.objects
            .iter()
            .find(|(_, obj)| obj.name.as_deref() == Some(name))
    }

    /// Number of objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the graph has no objects
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over keys and objects
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &Renderable)> {
        self.objects.iter()
    }

    /// Visible children of a frame (empty for non-frames and stale keys)
    pub fn children(&self, frame: ObjectKey) -> &[ObjectKey] {
        match self.objects.get(frame) {
            Some(obj) => obj.children(),
            None => &[],
        }
    }

    /// All objects whose frame chain passes through `key`, visible or not
    pub fn descendants(&self, key: ObjectKey) -> Vec<ObjectKey> {
        self.objects
            .keys()
            .filter(|&k| k != key && self.ancestors(k).contains(&key))
            .collect()
    }

    /// Frame chain of `key`, nearest parent first
    pub fn ancestors(&self, key: ObjectKey) -> Vec<ObjectKey> {
        let mut chain = Vec::new();
        let mut current = self.objects.get(key).and_then(|obj| obj.frame());
        while let Some(f) = current {
            if chain.contains(&f) || chain.len() > self.objects.len() {
                break;
            }
            chain.push(f);
            current = self.objects.get(f).and_then(|obj| obj.frame());
        }
        chain
    }

    /// Transform of `key` in display space, composed through its frames
    pub fn world_transform(&self, key: ObjectKey) -> Option<Transform3D> {
        let mut transform = self.objects.get(key)?.transform;
        for frame in self.ancestors(key) {
            transform = self.objects[frame].transform.compose(&transform);
        }
        Some(transform)
    }

    /// Create a renderable
    ///
    /// The display is resolved from the attachment: an explicit display must
    /// match the frame's display when both are given; a frame alone lends its
    /// display; neither falls back to the selected display. The template is
    /// checked against that display before anything is inserted.
    pub fn spawn(&mut self, attachment: Attachment, template: ObjectTemplate) -> Result<ObjectKey, SceneError> {
        logged("spawn", self.try_spawn(attachment, template))
    }

    fn try_spawn(&mut self, attachment: Attachment, template: ObjectTemplate) -> Result<ObjectKey, SceneError> {
        let display = match (attachment.display, attachment.frame) {
            (Some(display), Some(frame)) => {
                self.check_display(display)?;
                self.check_frame_target(frame, Some(display))?;
                Some(display)
            }
            (Some(display), None) => {
                self.check_display(display)?;
                Some(display)
            }
            (None, Some(frame)) => self.frame_display(frame)?,
            (None, None) => self.selected,
        };

        if attachment.visible && display.is_none() {
            return Err(ConfigurationError::NoDisplay.into());
        }

        let settings = display.and_then(|d| self.displays.get(d)).map(|d| &d.settings);
        template.check(settings)?;

        let name = template.name.clone();
        let transform = template.transform;
        let (shape, appearance) = template.resolve(settings);

        let mut renderable = Renderable::new(shape, transform, appearance);
        renderable.name = name;
        let key = self.insert(renderable, display, attachment.frame, attachment.visible);
        log::debug!(
            "Spawned {} {:?} on display {:?} in frame {:?} (visible: {})",
            self.objects[key].shape().kind(),
            key,
            display,
            attachment.frame,
            attachment.visible
        );
        Ok(key)
    }

    /// Copy an object into the same display, frame and visibility as the original
    ///
    /// The copy gets the original's shape, appearance, transform and name. A
    /// copied frame starts with no children.
    pub fn duplicate(&mut self, key: ObjectKey) -> Result<ObjectKey, SceneError> {
        logged("duplicate", self.try_duplicate(key))
    }

    fn try_duplicate(&mut self, key: ObjectKey) -> Result<ObjectKey, SceneError> {
        let original = self.objects.get(key).ok_or(SceneError::NotFound(key))?;
        let (display, frame, visible) = (original.display(), original.frame(), original.visible());
        let copy = original.detached_copy();

        if let Some(d) = display {
            self.check_display(d)?;
        }
        if let Some(f) = frame {
            self.check_frame_target(f, display)?;
        }
        if visible && display.is_none() {
            return Err(ConfigurationError::NoDisplay.into());
        }
        let settings = display.and_then(|d| self.displays.get(d)).map(|d| &d.settings);
        if copy.capabilities().contains(Capabilities::UNIFORM_AXIS) && settings.is_some_and(|s| !s.uniform) {
            return Err(ConfigurationError::NonUniformDisplay { shape: copy.shape().kind() }.into());
        }

        let new_key = self.insert(copy, display, frame, visible);
        log::debug!("Duplicated {:?} as {:?}", key, new_key);
        Ok(new_key)
    }

    /// Move an unframed object to another display
    ///
    /// Fails while the object is inside a frame. When the object is a frame,
    /// everything inside it follows to the new display.
    pub fn set_display(&mut self, key: ObjectKey, display: DisplayKey) -> Result<(), SceneError> {
        logged("set_display", self.try_set_display(key, display))
    }

    fn try_set_display(&mut self, key: ObjectKey, display: DisplayKey) -> Result<(), SceneError> {
        let obj = self.objects.get(key).ok_or(SceneError::NotFound(key))?;
        let (old_display, frame, visible) = (obj.display(), obj.frame(), obj.visible());

        if old_display == Some(display) {
            return Ok(());
        }
        if let Some(frame) = frame {
            return Err(InvalidTransitionError::DisplayChangeWhileFramed { frame }.into());
        }
        self.check_display(display)?;

        let subtree: Vec<ObjectKey> = std::iter::once(key).chain(self.descendants(key)).collect();
        if !self.displays[display].settings.uniform {
            let needs_uniform = subtree
                .iter()
                .map(|&k| &self.objects[k])
                .find(|obj| obj.capabilities().contains(Capabilities::UNIFORM_AXIS));
            if let Some(obj) = needs_uniform {
                return Err(ConfigurationError::NonUniformDisplay { shape: obj.shape().kind() }.into());
            }
        }

        if visible {
            self.leave_container(key, old_display, None);
            self.join_container(key, Some(display), None);
        }
        for &k in &subtree {
            self.objects[k].set_display_ref(Some(display));
        }
        log::debug!("Moved {:?} from display {:?} to {:?}", key, old_display, display);
        Ok(())
    }

    /// Place an object in a frame, or take it out with `None`
    ///
    /// The frame must be on the object's display and must not be the object
    /// itself or anything inside it.
    pub fn set_frame(&mut self, key: ObjectKey, frame: Option<ObjectKey>) -> Result<(), SceneError> {
        logged("set_frame", self.try_set_frame(key, frame))
    }

    fn try_set_frame(&mut self, key: ObjectKey, new_frame: Option<ObjectKey>) -> Result<(), SceneError> {
        let obj = self.objects.get(key).ok_or(SceneError::NotFound(key))?;
        let (display, old_frame, visible) = (obj.display(), obj.frame(), obj.visible());

        if new_frame == old_frame {
            return Ok(());
        }
        if let Some(frame) = new_frame {
            self.check_frame_target(frame, display)?;
            self.check_cycle(key, frame)?;
        } else if visible && display.is_none() {
            return Err(InvalidTransitionError::ShowDetached.into());
        }

        if visible {
            self.leave_container(key, display, old_frame);
            self.join_container(key, display, new_frame);
        }
        self.objects[key].set_frame_ref(new_frame);
        log::debug!("Moved {:?} from frame {:?} to {:?}", key, old_frame, new_frame);
        Ok(())
    }

    /// Show or hide an object
    pub fn set_visible(&mut self, key: ObjectKey, visible: bool) -> Result<(), SceneError> {
        logged("set_visible", self.try_set_visible(key, visible))
    }

    fn try_set_visible(&mut self, key: ObjectKey, visible: bool) -> Result<(), SceneError> {
        let obj = self.objects.get(key).ok_or(SceneError::NotFound(key))?;
        let (display, frame, was_visible) = (obj.display(), obj.frame(), obj.visible());

        if visible == was_visible {
            return Ok(());
        }
        if visible {
            if display.is_none() {
                return Err(InvalidTransitionError::ShowDetached.into());
            }
            self.join_container(key, display, frame);
            self.renderer.register(key);
        } else {
            self.leave_container(key, display, frame);
            self.renderer.unregister(key);
        }
        self.objects[key].set_visible_flag(visible);
        log::debug!("Set {:?} visible: {}", key, visible);
        Ok(())
    }

    /// Remove an object from the graph and return it
    ///
    /// Children of a removed frame move up to the removed frame's own parent
    /// (or its display root) and absorb its transform, so they stay in place.
    pub fn remove(&mut self, key: ObjectKey) -> Result<Renderable, SceneError> {
        logged("remove", self.try_remove(key))
    }

    fn try_remove(&mut self, key: ObjectKey) -> Result<Renderable, SceneError> {
        let obj = self.objects.get(key).ok_or(SceneError::NotFound(key))?;
        let (display, parent, visible, transform) =
            (obj.display(), obj.frame(), obj.visible(), obj.transform);

        if obj.is_frame() {
            let children: Vec<ObjectKey> = self
                .objects
                .iter()
                .filter(|(_, child)| child.frame() == Some(key))
                .map(|(k, _)| k)
                .collect();
            for child in children {
                if self.objects[child].visible() {
                    // Visible children share the frame's display
                    self.leave_container(child, display, Some(key));
                    self.join_container(child, display, parent);
                }
                let child_obj = &mut self.objects[child];
                child_obj.transform = transform.compose(&child_obj.transform);
                child_obj.set_frame_ref(parent);
            }
        }

        if visible {
            self.leave_container(key, display, parent);
            self.renderer.unregister(key);
        }
        let removed = self.objects.remove(key).ok_or(SceneError::NotFound(key))?;
        log::debug!("Removed {} {:?}", removed.shape().kind(), key);
        Ok(removed)
    }

    // --- Checks (no mutation) ---

    fn check_display(&self, display: DisplayKey) -> Result<(), ConfigurationError> {
        if self.displays.contains_key(display) {
            Ok(())
        } else {
            Err(ConfigurationError::UnknownDisplay(display))
        }
    }

    /// Display of an existing frame
    fn frame_display(&self, frame: ObjectKey) -> Result<Option<DisplayKey>, SceneError> {
        let target = self.objects.get(frame).ok_or(SceneError::NotFound(frame))?;
        if !target.is_frame() {
            return Err(ConfigurationError::NotAFrame(frame).into());
        }
        Ok(target.display())
    }

    /// `frame` must be a live frame on `display`
    fn check_frame_target(&self, frame: ObjectKey, display: Option<DisplayKey>) -> Result<(), SceneError> {
        let frame_display = self.frame_display(frame)?;
        if frame_display != display {
            return Err(ConfigurationError::CrossDisplay { frame, frame_display, display }.into());
        }
        Ok(())
    }

    /// Walk from `frame` to its root; meeting `key` means a cycle
    fn check_cycle(&self, key: ObjectKey, frame: ObjectKey) -> Result<(), CycleError> {
        let mut current = Some(frame);
        let mut steps = 0;
        while let Some(f) = current {
            if f == key || steps > self.objects.len() {
                return Err(CycleError { object: key, frame });
            }
            steps += 1;
            current = self.objects.get(f).and_then(|obj| obj.frame());
        }
        Ok(())
    }

    // --- Container membership (callers have already validated) ---

    /// Insert a detached renderable with the given attachment, joining its container when visible
    fn insert(
        &mut self,
        mut renderable: Renderable,
        display: Option<DisplayKey>,
        frame: Option<ObjectKey>,
        visible: bool,
    ) -> ObjectKey {
        renderable.set_attachment(display, frame);
        renderable.set_visible_flag(visible);
        let key = self.objects.insert(renderable);
        if visible {
            self.join_container(key, display, frame);
            self.renderer.register(key);
        }
        key
    }

    fn join_container(&mut self, key: ObjectKey, display: Option<DisplayKey>, frame: Option<ObjectKey>) {
        match frame {
            Some(f) => {
                if let Some(data) = self.objects.get_mut(f).and_then(|obj| obj.frame_data_mut()) {
                    data.add_child(key);
                }
            }
            None => {
                if let Some(d) = display.and_then(|d| self.displays.get_mut(d)) {
                    d.add_root(key);
                }
            }
        }
    }

    fn leave_container(&mut self, key: ObjectKey, display: Option<DisplayKey>, frame: Option<ObjectKey>) {
        match frame {
            Some(f) => {
                if let Some(data) = self.objects.get_mut(f).and_then(|obj| obj.frame_data_mut()) {
                    data.remove_child(key);
                }
            }
            None => {
                if let Some(d) = display.and_then(|d| self.displays.get_mut(d)) {
                    d.remove_root(key);
                }
            }
        }
    }
}
