use crate::KvoError;

bitflags::bitflags! {
    /// Selects which values an observer captures and receives.
    ///
    /// An observer without [`ObservingOptions::OLD`] always receives `None` as
    /// the old value, and one without [`ObservingOptions::NEW`] always receives
    /// `None` as the new value. The callback still fires either way.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObservingOptions: u32 {
        /// Capture the value after the change (in `did_change`).
        const NEW = 1 << 0;
        /// Capture the value before the change (in `will_change`).
        const OLD = 1 << 1;
    }
}

impl ObservingOptions {
    pub(crate) const fn wants_new(self) -> bool {
        self.contains(Self::NEW)
    }

    pub(crate) const fn wants_old(self) -> bool {
        self.contains(Self::OLD)
    }
}

impl TryFrom<u32> for ObservingOptions {
    type Error = KvoError;

    /// Validates raw option bits, rejecting anything outside `NEW | OLD`.
    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(KvoError::UnknownOptionBits { bits })
    }
}
