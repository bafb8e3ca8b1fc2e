/// Definitions evaluated by every freshly loaded engine.
pub const PRELUDE: &str = "\
# Base units
@base(m) @base(g) @base(s) @base(mol) @base(K) @base(iu)

# Volume and concentration
0 (m) 1 (m) * 1 (m) * 1e-3 @derived(l)
0 (mol) 1 (l) / 1e3 @derived(M)

# Molar mass
0 (g) 1 (mol) / 1 @derived(Da)

# Time
0 (s) 60 @derived(min)
0 (s) 3600 @derived(h)

# Temperature
273.15 (K) 1 @derived(degC)

c
";
