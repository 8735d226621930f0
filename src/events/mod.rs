mod event;
mod sink;

pub use event::{
    Event, PayloadChoiceAdd, PayloadChoiceRemove, PayloadNodeAdd, PayloadNodeDeselect,
    PayloadNodeDragEnd, PayloadNodeDragStart, PayloadNodeMove, PayloadNodeRemove,
    PayloadNodeSelect, PayloadNodeUpdate, PayloadNodesChange, PayloadPan, PayloadZoom,
};

pub use sink::EventSink;
