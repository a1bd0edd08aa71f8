//! Single-slot handshake primitives.
//!
//! Every stage boundary is a [`Latch`]: one slot, filled by the producer and
//! drained by the consumer. Because stages tick in reverse pipeline order, a
//! value pushed in cycle N is seen by the consumer in cycle N+1, which makes
//! the latch behave like a register.
//!
//! Feedback runs over a [`ForwardingIf`]: a single-slot sideband carrying a
//! payload plus a `wait` flag. A latch pushed with [`Latch::push_gated`] refuses
//! new data while the link it is gated on is waiting; that is how the
//! instruction cache holds the scheduler off during a miss.
//!
//! Handshake rules:
//! 1. A push into a full latch is rejected and hands the value back.
//! 2. A stage that cannot push downstream must not pop its input that cycle.
//! 3. [`Latch::send`] and [`ForwardingIf::send`] are for producers that have
//!    already checked readiness; a full slot there is a protocol violation and panics.

/// Single-slot pipeline register between two stages.
#[derive(Debug, Clone)]
pub struct Latch<T> {
    name: &'static str,
    slot: Option<T>,
}

impl<T> Latch<T> {
    /// Creates an empty latch. `name` appears in protocol-violation panics.
    pub const fn new(name: &'static str) -> Self {
        Self { name, slot: None }
    }

    /// Name given at construction.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if a push would succeed.
    #[inline]
    pub const fn ready_for_push(&self) -> bool {
        self.slot.is_none()
    }

    /// Returns `true` if a gated push would succeed.
    #[inline]
    pub const fn ready_for_push_gated<S>(&self, link: &ForwardingIf<S>) -> bool {
        self.slot.is_none() && !link.wait
    }

    /// Returns `true` if the latch holds a value.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.slot.is_some()
    }

    /// Stores `item` if the latch is empty.
    ///
    /// # Errors
    ///
    /// Returns `item` unchanged when the latch is occupied.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.slot.is_some() {
            return Err(item);
        }
        self.slot = Some(item);
        Ok(())
    }

    /// Stores `item` if the latch is empty and `link` is not waiting.
    ///
    /// # Errors
    ///
    /// Returns `item` unchanged when the push is refused.
    pub fn push_gated<S>(&mut self, item: T, link: &ForwardingIf<S>) -> Result<(), T> {
        if link.wait {
            return Err(item);
        }
        self.push(item)
    }

    /// Stores `item`, which the caller has checked will fit.
    ///
    /// # Panics
    ///
    /// Panics if the latch is occupied.
    pub fn send(&mut self, item: T) {
        assert!(self.slot.is_none(), "push into full latch `{}`", self.name);
        self.slot = Some(item);
    }

    /// Removes and returns the held value.
    pub const fn pop(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Inspects the held value without consuming it.
    pub const fn snoop(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// Drops the held value.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

/// Single-slot sideband channel with a back-pressure flag.
#[derive(Debug, Clone)]
pub struct ForwardingIf<T> {
    name: &'static str,
    payload: Option<T>,
    wait: bool,
}

impl<T> ForwardingIf<T> {
    /// Creates an empty, non-waiting link.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
            wait: false,
        }
    }

    /// Stores `item` if the link is empty.
    ///
    /// # Errors
    ///
    /// Returns `item` unchanged when a payload is already present.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.payload.is_some() {
            return Err(item);
        }
        self.payload = Some(item);
        Ok(())
    }

    /// Stores `item`, which the caller expects to be the only signal this cycle.
    ///
    /// # Panics
    ///
    /// Panics if an unconsumed payload is present.
    pub fn send(&mut self, item: T) {
        assert!(
            self.payload.is_none(),
            "signal overwritten on link `{}`",
            self.name
        );
        self.payload = Some(item);
    }

    /// Stores `item`, replacing any unconsumed payload.
    pub fn force_push(&mut self, item: T) {
        self.payload = Some(item);
    }

    /// Removes and returns the payload.
    pub const fn pop(&mut self) -> Option<T> {
        self.payload.take()
    }

    /// Inspects the payload without consuming it.
    pub const fn snoop(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Raises or lowers the wait flag.
    pub const fn set_wait(&mut self, wait: bool) {
        self.wait = wait;
    }

    /// Returns the wait flag.
    pub const fn is_waiting(&self) -> bool {
        self.wait
    }

    /// Drops the payload and lowers the wait flag.
    pub fn clear(&mut self) {
        self.payload = None;
        self.wait = false;
    }
}
