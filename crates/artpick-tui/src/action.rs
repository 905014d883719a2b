/// User intents produced by the input layer and consumed by `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),

    // Row cursor
    MoveUp,
    MoveDown,
    GoTop,
    GoBottom,
    ScrollDown,
    ScrollUp,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize,
    Reload,

    // Selection
    ToggleRow,
    ToggleAllVisible,
    OpenQuickPick,

    // Text input (quick-pick overlay)
    TextInput(char),
    TextBackspace,
    TextConfirm,
    TextCancel,

    // Display
    CycleSort,
    ReverseSort,
    ToggleSelectionPanel,
    ToggleHelp,
    NavigateBack,
}
