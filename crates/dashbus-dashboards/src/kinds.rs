/// Declares a closed set of event kinds with their wire tags.
///
/// Generates the enum plus `ALL`, [`EventKind`](dashbus_core::EventKind),
/// `Display`, `FromStr` and serde impls keyed by the tag.
macro_rules! event_kinds {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $tag)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];
        }

        impl dashbus_core::EventKind for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $tag, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(dashbus_core::EventKind::as_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = dashbus_core::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $tag => Ok($name::$variant), )+
                    other => Err(dashbus_core::CoreError::UnknownKind(other.to_string())),
                }
            }
        }
    };
}

pub(crate) use event_kinds;
