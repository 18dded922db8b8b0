#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Hash)]
pub struct Level(pub u32);

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Default)]
pub struct Score(pub u32);
