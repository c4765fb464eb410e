//! Macros for ergonomic action map construction.

/// Build an [`ActionMap`](crate::core::ActionMap) from `name => closure` pairs.
///
/// Each closure has the uniform action signature
/// `Fn(&mut C, &[serde_json::Value]) -> ActionResult`.
///
/// # Example
///
/// ```
/// use fsm_table::action_map;
/// use fsm_table::core::{ActionMap, Continuation};
/// use serde_json::Value;
///
/// let actions: ActionMap<u32> = action_map! {
///     "increment" => |n: &mut u32, _args: &[Value]| {
///         *n += 1;
///         Ok(Continuation::Stop)
///     },
///     "overflow" => |_n: &mut u32, _args: &[Value]| Ok(Continuation::next("reset")),
/// };
///
/// assert_eq!(actions.len(), 2);
/// ```
#[macro_export]
macro_rules! action_map {
    ($($name:expr => $action:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::core::ActionMap::new();
        $(
            map.insert(::std::string::String::from($name), $crate::core::action($action));
        )*
        map
    }};
}
