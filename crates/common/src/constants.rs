//! Static reference tables shared by the template parser and the lint rules.

use phf::{phf_map, phf_set};

/// Elements that never have content or an end tag
pub static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen",
    "link", "menuitem", "meta", "param", "source", "track", "wbr",
};

/// Well-known HTML element names
pub static HTML_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "html", "body", "base", "head", "link", "meta", "style", "title",
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3",
    "h4", "h5", "h6", "hgroup", "nav", "section", "div", "dd", "dl", "dt",
    "figcaption", "figure", "hr", "img", "li", "main", "ol", "p", "pre",
    "ul", "a", "b", "abbr", "bdi", "bdo", "br", "cite", "code", "data",
    "dfn", "em", "i", "kbd", "mark", "q", "rp", "rt", "rtc", "ruby", "s",
    "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
    "wbr", "area", "audio", "map", "track", "video", "embed", "object",
    "param", "source", "canvas", "script", "noscript", "del", "ins",
    "caption", "col", "colgroup", "table", "thead", "tbody", "tfoot", "td",
    "th", "tr", "button", "datalist", "fieldset", "form", "input", "label",
    "legend", "meter", "optgroup", "option", "output", "progress", "select",
    "textarea", "details", "dialog", "menu", "menuitem", "summary",
    "content", "element", "shadow", "template", "slot", "blockquote",
    "iframe", "noframes", "picture",
};

/// Well-known SVG element names (case sensitive)
pub static SVG_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "a", "animate", "animateMotion", "animateTransform", "audio", "canvas",
    "circle", "clipPath", "defs", "desc", "discard", "ellipse", "feBlend",
    "feColorMatrix", "feComponentTransfer", "feComposite",
    "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap",
    "feDistantLight", "feDropShadow", "feFlood", "feFuncA", "feFuncB",
    "feFuncG", "feFuncR", "feGaussianBlur", "feImage", "feMerge",
    "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "filter",
    "foreignObject", "g", "image", "line", "linearGradient", "marker",
    "mask", "metadata", "mpath", "path", "pattern", "polygon", "polyline",
    "radialGradient", "rect", "script", "set", "stop", "style", "svg",
    "switch", "symbol", "text", "textPath", "title", "tspan", "unknown",
    "use", "video", "view",
};

/// Well-known MathML element names
pub static MATH_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "math", "maction", "annotation", "annotation-xml", "menclose", "merror",
    "mfenced", "mfrac", "mglyph", "mi", "mlabeledtr", "mmultiscripts", "mn",
    "mo", "mover", "mpadded", "mphantom", "mprescripts", "mroot", "mrow",
    "ms", "mspace", "msqrt", "mstyle", "msub", "msubsup", "msup", "mtable",
    "mtd", "mtext", "mtr", "munder", "munderover", "none", "semantics",
};

/// JavaScript reserved words, including future and strict-mode ones
pub static JS_RESERVED_WORDS: phf::Set<&'static str> = phf_set! {
    "abstract", "arguments", "await", "boolean", "break", "byte", "case",
    "catch", "char", "class", "const", "continue", "debugger", "default",
    "delete", "do", "double", "else", "enum", "eval", "export", "extends",
    "false", "final", "finally", "float", "for", "function", "goto", "if",
    "implements", "import", "in", "instanceof", "int", "interface", "let",
    "long", "native", "new", "null", "package", "private", "protected",
    "public", "return", "short", "static", "super", "switch",
    "synchronized", "this", "throw", "throws", "transient", "true", "try",
    "typeof", "var", "void", "volatile", "while", "with", "yield",
};

/// Lifecycle hook option names of a component object
pub static LIFECYCLE_HOOKS: phf::Set<&'static str> = phf_set! {
    "beforeCreate", "created", "beforeMount", "mounted", "beforeUpdate",
    "updated", "activated", "deactivated", "beforeUnmount", "unmounted",
    "beforeDestroy", "destroyed", "renderTracked", "renderTriggered",
    "errorCaptured", "serverPrefetch",
};

/// Legacy `keyCode` modifiers with a safe key-name replacement.
///
/// Digit and letter codes are deliberately absent: their key name depends on
/// the keyboard layout.
pub static KEYCODE_TO_KEY: phf::Map<u32, &'static str> = phf_map! {
    8u32 => "backspace",
    9u32 => "tab",
    13u32 => "enter",
    16u32 => "shift",
    17u32 => "ctrl",
    18u32 => "alt",
    19u32 => "pause",
    20u32 => "caps-lock",
    27u32 => "escape",
    32u32 => "space",
    33u32 => "page-up",
    34u32 => "page-down",
    35u32 => "end",
    36u32 => "home",
    37u32 => "arrow-left",
    38u32 => "arrow-up",
    39u32 => "arrow-right",
    40u32 => "arrow-down",
    45u32 => "insert",
    46u32 => "delete",
};
