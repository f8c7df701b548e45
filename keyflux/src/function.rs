/// A user function bound to a `Function(id)` key.
#[derive(Clone, Copy, Debug)]
pub enum Function {
    /// Runs on press and returns to the resolver
    Handler(fn()),
    /// Leaves the firmware, e.g. jumping to the bootloader.
    ///
    /// Every held key is released before it runs.
    Terminal(fn() -> !),
}

/// Function table, indexed by function id.
#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionRegistry<'a> {
    functions: &'a [Function],
}

impl<'a> FunctionRegistry<'a> {
    pub const fn new(functions: &'a [Function]) -> Self {
        Self { functions }
    }

    pub fn get(&self, id: u8) -> Option<Function> {
        self.functions.get(id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
