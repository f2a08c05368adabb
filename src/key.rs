//! Key extraction: the only way the table looks inside a record.

/// Maps a borrowed record to its string key.
///
/// The returned key borrows from the record, so it stays valid for as
/// long as the table holds the record reference.
pub trait KeyExtractor<R: ?Sized> {
    fn key<'a>(&self, record: &'a R) -> &'a str;
}

/// Records that know their own key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for str {
    fn key(&self) -> &str {
        self
    }
}

impl Keyed for String {
    fn key(&self) -> &str {
        self.as_str()
    }
}

/// Extractor for [`Keyed`] records. This is the table's default.
#[derive(Copy, Clone, Debug, Default)]
pub struct ByKey;

impl<R: ?Sized + Keyed> KeyExtractor<R> for ByKey {
    #[inline]
    fn key<'a>(&self, record: &'a R) -> &'a str {
        record.key()
    }
}

/// Extractor backed by a closure, for records that do not implement
/// [`Keyed`] or when a different field should act as the key.
///
/// ```
/// use probe_table::KeyFn;
///
/// struct City { name: String }
/// let by_name = KeyFn::new(|c: &City| c.name.as_str());
/// # let _ = by_name;
/// ```
#[derive(Copy, Clone)]
pub struct KeyFn<F>(F);

impl<F> KeyFn<F> {
    pub fn new<R: ?Sized>(f: F) -> Self
    where
        F: for<'a> Fn(&'a R) -> &'a str,
    {
        KeyFn(f)
    }
}

impl<R: ?Sized, F> KeyExtractor<R> for KeyFn<F>
where
    F: for<'a> Fn(&'a R) -> &'a str,
{
    #[inline]
    fn key<'a>(&self, record: &'a R) -> &'a str {
        (self.0)(record)
    }
}

impl<F> core::fmt::Debug for KeyFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("KeyFn(..)")
    }
}
