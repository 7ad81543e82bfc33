//! In-process host environment
//!
//! [`EventHub`] plays the part of the windowing host: it owns the surfaces
//! pointer events are scoped to, keeps a registry of listeners per channel,
//! and delivers events to them synchronously in registration order.
//!
//! Every subscription is identified by the [`ListenerId`] returned from
//! [`EventHub::subscribe`]; removal goes through that id, so a listener can
//! only ever be detached by whoever holds its handle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::events::{Channel, HostEvent, KeyboardEvent, PointerEvent};
use crate::error::InputError;

/// Axis-aligned bounding box in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Anything pointer events can be scoped to
///
/// Geometry is read on demand; implementations may move or resize between
/// calls.
pub trait Surface {
    fn bounding_rect(&self) -> Rect;
}

/// A surface whose bounding box is set explicitly
#[derive(Debug, Default)]
pub struct RectSurface {
    rect: Cell<Rect>,
}

impl RectSurface {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(rect),
        }
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Move the top-left corner, keeping the size
    pub fn move_to(&self, left: f64, top: f64) {
        let rect = self.rect.get();
        self.rect.set(Rect { left, top, ..rect });
    }
}

impl Surface for RectSurface {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }
}

/// Handle to a surface registered with an [`EventHub`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Stable identity of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Pointer channels of one surface
    Surface(SurfaceId),
    /// Process-wide keyboard channels
    Global,
}

/// Callback invoked for every event on its channel
pub type Listener = Rc<dyn Fn(&HostEvent)>;

struct Registration {
    id: ListenerId,
    target: Target,
    channel: Channel,
    listener: Listener,
}

/// Ids are never reused; a hub would need 2^64 registrations to run out
#[derive(Default)]
struct HubInner {
    surfaces: HashMap<SurfaceId, Rc<dyn Surface>>,
    listeners: Vec<Registration>,
    next_surface: u64,
    next_listener: u64,
}

/// Shared handle to the host environment
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Rc<RefCell<HubInner>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface pointer events can be dispatched to
    pub fn add_surface(&self, surface: Rc<dyn Surface>) -> SurfaceId {
        let mut inner = self.inner.borrow_mut();
        let id = SurfaceId(inner.next_surface);
        inner.next_surface += 1;
        inner.surfaces.insert(id, surface);
        debug!(%id, "surface added");
        id
    }

    /// Remove a surface together with every listener scoped to it
    pub fn remove_surface(&self, id: SurfaceId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let removed = inner.surfaces.remove(&id).is_some();
        if removed {
            inner
                .listeners
                .retain(|reg| reg.target != Target::Surface(id));
            debug!(%id, "surface removed");
        }
        removed
    }

    pub fn surface(&self, id: SurfaceId) -> Option<Rc<dyn Surface>> {
        self.inner.borrow().surfaces.get(&id).cloned()
    }

    /// Attach a listener to a channel
    ///
    /// Pointer channels need a surface target, keyboard channels the global
    /// target; any other pairing is rejected.
    pub fn subscribe(
        &self,
        target: Target,
        channel: Channel,
        listener: Listener,
    ) -> Result<ListenerId, InputError> {
        let mut inner = self.inner.borrow_mut();

        match target {
            Target::Surface(surface) => {
                if !channel.is_pointer() {
                    return Err(InputError::ChannelScope { channel, target });
                }
                if !inner.surfaces.contains_key(&surface) {
                    return Err(InputError::UnknownSurface(surface));
                }
            }
            Target::Global => {
                if !channel.is_keyboard() {
                    return Err(InputError::ChannelScope { channel, target });
                }
            }
        }

        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push(Registration {
            id,
            target,
            channel,
            listener,
        });
        trace!(?id, ?target, ?channel, "listener attached");
        Ok(id)
    }

    /// Detach a listener; returns false if it was already gone
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|reg| reg.id != id);
        let removed = inner.listeners.len() != before;
        if removed {
            trace!(?id, "listener detached");
        }
        removed
    }

    /// Number of live listeners across all targets and channels
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Number of live listeners for one target/channel pair
    pub fn listeners_on(&self, target: Target, channel: Channel) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|reg| reg.target == target && reg.channel == channel)
            .count()
    }

    /// Deliver a pointer event to the listeners of one surface
    pub fn dispatch_pointer(&self, surface: SurfaceId, channel: Channel, event: PointerEvent) {
        debug_assert!(channel.is_pointer(), "{channel:?} is not a pointer channel");
        self.dispatch(Target::Surface(surface), channel, &HostEvent::Pointer(event));
    }

    /// Deliver a keyboard event to the global listeners
    pub fn dispatch_key(&self, channel: Channel, event: KeyboardEvent) {
        debug_assert!(channel.is_keyboard(), "{channel:?} is not a keyboard channel");
        self.dispatch(Target::Global, channel, &HostEvent::Key(event));
    }

    pub fn pointer_move(&self, surface: SurfaceId, client_x: f64, client_y: f64) {
        self.dispatch_pointer(surface, Channel::PointerMove, PointerEvent::moved(client_x, client_y));
    }

    pub fn pointer_down(&self, surface: SurfaceId, button: i16) {
        self.dispatch_pointer(surface, Channel::PointerDown, PointerEvent::button(button));
    }

    pub fn pointer_up(&self, surface: SurfaceId, button: i16) {
        self.dispatch_pointer(surface, Channel::PointerUp, PointerEvent::button(button));
    }

    pub fn key_down(&self, key: &str) {
        self.dispatch_key(Channel::KeyDown, KeyboardEvent::new(key));
    }

    pub fn key_up(&self, key: &str) {
        self.dispatch_key(Channel::KeyUp, KeyboardEvent::new(key));
    }

    fn dispatch(&self, target: Target, channel: Channel, event: &HostEvent) {
        // Snapshot first: listeners may subscribe or unsubscribe while running
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|reg| reg.target == target && reg.channel == channel)
            .map(|reg| Rc::clone(&reg.listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventHub")
            .field("surfaces", &inner.surfaces.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(hits: &Rc<Cell<u32>>) -> Listener {
        let hits = Rc::clone(hits);
        Rc::new(move |_: &HostEvent| hits.set(hits.get() + 1))
    }

    #[test]
    fn rect_surface_moves_without_resizing() {
        let surface = RectSurface::new(Rect::new(0.0, 0.0, 40.0, 30.0));
        surface.move_to(5.0, 6.0);

        assert_eq!(surface.bounding_rect(), Rect::new(5.0, 6.0, 40.0, 30.0));
    }

    #[test]
    fn dispatch_reaches_only_matching_channel_and_surface() {
        let hub = EventHub::new();
        let a = hub.add_surface(Rc::new(RectSurface::default()));
        let b = hub.add_surface(Rc::new(RectSurface::default()));
        let hits = Rc::new(Cell::new(0));

        hub.subscribe(Target::Surface(a), Channel::PointerDown, counter(&hits))
            .unwrap();

        hub.pointer_down(a, 0);
        hub.pointer_up(a, 0);
        hub.pointer_down(b, 0);
        hub.key_down("a");

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_listener() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));

        let first = hub
            .subscribe(Target::Global, Channel::KeyDown, counter(&hits))
            .unwrap();
        hub.subscribe(Target::Global, Channel::KeyDown, counter(&hits))
            .unwrap();

        assert!(hub.unsubscribe(first));
        assert!(!hub.unsubscribe(first), "second removal is a no-op");

        hub.key_down("a");
        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let hub = EventHub::new();
        let first = hub.add_surface(Rc::new(RectSurface::default()));
        hub.remove_surface(first);
        let second = hub.add_surface(Rc::new(RectSurface::default()));
        assert_ne!(first, second);

        let noop: Listener = Rc::new(|_: &HostEvent| {});
        let a = hub
            .subscribe(Target::Global, Channel::KeyDown, Rc::clone(&noop))
            .unwrap();
        hub.unsubscribe(a);
        let b = hub.subscribe(Target::Global, Channel::KeyDown, noop).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn subscribe_rejects_bad_targets() {
        let hub = EventHub::new();
        let surface = hub.add_surface(Rc::new(RectSurface::default()));
        let noop: Listener = Rc::new(|_: &HostEvent| {});

        assert!(matches!(
            hub.subscribe(Target::Global, Channel::PointerMove, Rc::clone(&noop)),
            Err(InputError::ChannelScope { .. })
        ));
        assert!(matches!(
            hub.subscribe(Target::Surface(surface), Channel::KeyUp, Rc::clone(&noop)),
            Err(InputError::ChannelScope { .. })
        ));

        hub.remove_surface(surface);
        assert!(matches!(
            hub.subscribe(Target::Surface(surface), Channel::PointerMove, noop),
            Err(InputError::UnknownSurface(id)) if id == surface
        ));
    }

    #[test]
    fn removing_a_surface_drops_its_listeners() {
        let hub = EventHub::new();
        let surface = hub.add_surface(Rc::new(RectSurface::default()));
        let hits = Rc::new(Cell::new(0));

        hub.subscribe(Target::Surface(surface), Channel::PointerMove, counter(&hits))
            .unwrap();
        hub.subscribe(Target::Global, Channel::KeyDown, counter(&hits))
            .unwrap();

        assert!(hub.remove_surface(surface));
        assert_eq!(hub.listener_count(), 1);
        assert!(hub.surface(surface).is_none());
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_dispatch() {
        let hub = EventHub::new();
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));

        let listener: Listener = {
            let hub = hub.clone();
            let slot = Rc::clone(&slot);
            let hits = Rc::clone(&hits);
            Rc::new(move |_: &HostEvent| {
                hits.set(hits.get() + 1);
                if let Some(id) = slot.take() {
                    hub.unsubscribe(id);
                }
            })
        };
        let id = hub
            .subscribe(Target::Global, Channel::KeyUp, listener)
            .unwrap();
        slot.set(Some(id));

        hub.key_up("a");
        hub.key_up("a");

        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }
}
