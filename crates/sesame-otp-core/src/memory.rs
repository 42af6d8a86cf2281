//! Secure key material storage.
//!
//! [`KeyMaterial`] is the only holder of OTP secret bytes in this crate:
//! - Zeroes memory on drop via [`secrecy`]/[`zeroize`]
//! - Locks pages in RAM via `mlock` to prevent swap
//! - Masks output in `Debug`/`Display` to prevent accidental leakage
//! - Exposes no raw secret getter — consumers compute an HMAC over data
//!   and the secret never leaves the type outside a crate-internal scope

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use ring::hmac;
use secrecy::{ExposeSecret, SecretSlice};
use zeroize::Zeroize;

use crate::base32;
use crate::error::OtpError;
use crate::otp::HashMode;

// ---------------------------------------------------------------------------
// Platform-specific memory locking
// ---------------------------------------------------------------------------

/// RAII guard that unlocks memory on drop.
///
/// When created, locks a memory region via `mlock` to prevent it from being
/// swapped to disk. On drop, calls `munlock` to release the lock.
pub struct LockedRegion {
    ptr: *const u8,
    len: usize,
    locked: bool,
}

// SAFETY: The pointer is only used for mlock/munlock system calls, which
// are thread-safe. The pointed-to data is owned by KeyMaterial and is not
// accessed through LockedRegion.
unsafe impl Send for LockedRegion {}
unsafe impl Sync for LockedRegion {}

impl LockedRegion {
    /// Attempt to lock a memory region. Returns a guard that unlocks on drop.
    ///
    /// If `mlock` fails (e.g., insufficient privileges or quota), the region
    /// is **not** locked but no error is returned — this is a soft fallback.
    #[must_use]
    pub(crate) fn try_lock(ptr: *const u8, len: usize) -> Self {
        let locked = platform::try_mlock(ptr, len);
        if !locked && len > 0 {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                eprintln!(
                    "[sesame-otp-core] WARNING: mlock failed — \
                     secret data may be swapped to disk. \
                     Consider increasing RLIMIT_MEMLOCK."
                );
            });
        }
        Self { ptr, len, locked }
    }

    /// Returns `true` if the memory region is currently locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Drop for LockedRegion {
    fn drop(&mut self) {
        if self.locked {
            platform::try_munlock(self.ptr, self.len);
        }
    }
}

// ---------------------------------------------------------------------------
// KeyMaterial
// ---------------------------------------------------------------------------

/// Opaque holder of an OTP shared secret.
///
/// Wraps [`SecretSlice<u8>`] from the `secrecy` crate and adds:
/// - `mlock` on allocation (soft fallback if unavailable)
/// - Masked `Debug` output (`KeyMaterial(***)`)
/// - Zeroization on drop (via `secrecy`'s built-in `Zeroize`)
///
/// The secret is non-empty by construction. The only public read path is
/// [`KeyMaterial::compute_hmac`]; raw bytes stay inside the crate.
pub struct KeyMaterial {
    inner: SecretSlice<u8>,
    lock: LockedRegion,
}

impl KeyMaterial {
    /// Create new `KeyMaterial` from the given secret bytes.
    ///
    /// The data is copied into a new allocation, then `mlock`'d.
    /// The caller should zeroize the source buffer after calling this.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::EmptySecret`] if `data` is empty.
    pub fn new(data: &[u8]) -> Result<Self, OtpError> {
        if data.is_empty() {
            return Err(OtpError::EmptySecret);
        }
        let inner: SecretSlice<u8> = data.to_vec().into();
        let exposed = inner.expose_secret();
        let lock = LockedRegion::try_lock(exposed.as_ptr(), exposed.len());
        Ok(Self { inner, lock })
    }

    /// Create `KeyMaterial` filled with `len` cryptographically random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::EmptySecret`] if `len` is zero, or
    /// [`OtpError::SecureMemory`] if the CSPRNG fails.
    pub fn random(len: usize) -> Result<Self, OtpError> {
        if len == 0 {
            return Err(OtpError::EmptySecret);
        }
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| OtpError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let result = Self::new(&bytes);
        bytes.zeroize();
        result
    }

    /// Decode RFC 4648 base32 text into `KeyMaterial`.
    ///
    /// Padding is optional and lowercase input is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidBase32`] for characters outside the
    /// alphabet, or [`OtpError::EmptySecret`] if the text decodes to
    /// nothing.
    pub fn from_base32(text: &str) -> Result<Self, OtpError> {
        let mut bytes = base32::decode(text)?;
        let result = Self::new(&bytes);
        bytes.zeroize();
        result
    }

    /// Encode the secret as RFC 4648 base32 text for provisioning.
    ///
    /// The returned string is itself secret-bearing; callers are expected
    /// to hand it straight to a provisioning surface and drop it.
    #[must_use]
    pub fn encode_base32(&self) -> String {
        base32::encode(self.inner.expose_secret())
    }

    /// Compute an HMAC over `data` with this secret under the given mode.
    ///
    /// This is the only public read path for the secret. The key schedule
    /// built by `ring` lives only for the duration of the call.
    #[must_use]
    pub fn compute_hmac(&self, mode: HashMode, data: &[u8]) -> Vec<u8> {
        let key = hmac::Key::new(mode.to_ring_algorithm(), self.inner.expose_secret());
        hmac::sign(&key, data).as_ref().to_vec()
    }

    /// Borrow the raw secret. Crate-internal; keep exposure scoped to a
    /// single expression.
    #[must_use]
    pub(crate) fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Returns the number of secret bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Returns `true` if there are no secret bytes. Always `false` for a
    /// constructed value; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the underlying memory is `mlock`'d.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

impl fmt::Display for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

// ---------------------------------------------------------------------------
// Platform-specific implementations
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod platform {
    pub(super) fn try_mlock(ptr: *const u8, len: usize) -> bool {
        if len == 0 {
            return true;
        }
        // SAFETY: mlock is safe to call with any valid pointer/length pair.
        // If the pointer is invalid, the kernel returns ENOMEM which we handle.
        unsafe { libc::mlock(ptr.cast(), len) == 0 }
    }

    pub(super) fn try_munlock(ptr: *const u8, len: usize) {
        if len == 0 {
            return;
        }
        // SAFETY: munlock is safe to call. Failure is non-critical.
        unsafe {
            libc::munlock(ptr.cast(), len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) fn try_mlock(_ptr: *const u8, _len: usize) -> bool {
        false
    }

    pub(super) fn try_munlock(_ptr: *const u8, _len: usize) {}
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
