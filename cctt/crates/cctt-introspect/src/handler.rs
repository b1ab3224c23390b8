//! The handler interface driven by the introspection walker.

use cctt_lex::TokenId;
use cctt_util::Result;

/// Receiver of structural callbacks from [`crate::introspect`].
///
/// Implementations may resolve the `TokenId`s they receive against the
/// token tree the walker ran over; they must not mutate the tree. Any
/// operation may fail; the walker stops at the first failure, notifies
/// [`abort`](Handler::abort), and returns the error.
pub trait Handler {
    /// There is no `CCTT_INTROSPECT ( .... )` anywhere. Called instead
    /// of `start`/`finish`, and nothing else is called.
    fn empty(&mut self) -> Result<()>;

    /// There is a `CCTT_INTROSPECT ( .... )` somewhere. Called before
    /// the first reported event.
    fn start(&mut self) -> Result<()>;

    /// Called after the last reported event on normal termination.
    fn finish(&mut self) -> Result<()>;

    /// An error occurred after `start()`. When `abort()` is called,
    /// `finish()` won't be.
    fn abort(&mut self) -> Result<()>;

    /// One `CCTT_INTROSPECT ( .... )` header.
    ///
    /// ```text
    /// CCTT_INTROSPECT ( .... )
    ///                 ^
    ///                 `--------- attributes
    /// ```
    ///
    /// The token is the `(`; its pair link delimits the argument region.
    fn add_attributes(&mut self, attributes: TokenId) -> Result<()>;

    /// The item the pending attributes applied to has been consumed.
    fn clear_attributes(&mut self) -> Result<()>;

    /// Entering a namespace (also reused for struct bodies).
    ///
    /// ```text
    /// namespace @name [:: @name] { .... }
    ///             ^              ^
    ///             |              `--------- past_names
    ///             `------------------------ first_name
    /// ```
    ///
    /// The half-open token range `[first_name, past_names)` covers every
    /// name segment of a possibly nested heading.
    fn enter_namespace(&mut self, first_name: TokenId, past_names: TokenId) -> Result<()>;

    /// The matching `}` of an entered namespace or struct body.
    fn leave_namespace(&mut self) -> Result<()>;

    /// A named enum definition.
    ///
    /// ```text
    /// enum @name { @enumerator1, @enumerator2 = 10 };
    /// enum struct @name: uint32_t { @enumerator1 };
    /// ```
    fn enter_enum(&mut self, name: TokenId) -> Result<()>;

    /// The end of a named enum body.
    fn leave_enum(&mut self) -> Result<()>;

    /// One enumerator of a named enum.
    fn enumerator(&mut self, name: TokenId) -> Result<()>;

    /// One enumerator of an *anonymous* enum.
    ///
    /// ```text
    /// enum { @constant1, @constant2 = 10 };
    /// enum: int { @constant1 };
    /// ```
    fn integral_constant(&mut self, name: TokenId) -> Result<()>;

    /// A named class/struct/union definition, reported before the
    /// `enter_namespace` for its body.
    fn structure(&mut self, name: TokenId) -> Result<()>;

    /// One *publicly visible* base in a base list. The half-open token
    /// range `[first, last)` covers the base, starting after any
    /// `virtual`/`public`/`private`/`protected` keywords.
    fn parent(&mut self, first: TokenId, last: TokenId) -> Result<()>;

    /// A variable or function declaration.
    ///
    /// ```text
    /// int name;
    /// int name = 10;
    /// int* name(nullptr);
    /// int name{10};
    /// auto name() { return 10; }
    /// static inline constexpr auto name() -> int;
    /// decltype(auto) name() { return 10; }
    /// ```
    ///
    /// `operator` overloads are recognized but not reported.
    fn variable_or_function(&mut self, name: TokenId) -> Result<()>;
}
