use crate::network::InstanceId;

/// Set of instances whose inputs were modified, in the order they were first marked
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    queue: Vec<InstanceId>,
    marked: Vec<bool>,
}

impl Worklist {
    /// Create an empty worklist for a netlist with the given number of instances
    pub fn new(nb_instances: usize) -> Worklist {
        Worklist {
            queue: Vec::new(),
            marked: vec![false; nb_instances],
        }
    }

    /// Mark an instance as dirty; marking twice has no effect
    pub fn mark(&mut self, id: InstanceId) {
        let i = id.index();
        if i >= self.marked.len() {
            self.marked.resize(i + 1, false);
        }
        if !self.marked[i] {
            self.marked[i] = true;
            self.queue.push(id);
        }
    }

    /// Whether the instance is dirty
    pub fn contains(&self, id: InstanceId) -> bool {
        self.marked.get(id.index()).copied().unwrap_or(false)
    }

    /// Returns true if no instance is dirty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of dirty instances
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Take all dirty instances, leaving the worklist empty
    pub fn take(&mut self) -> Vec<InstanceId> {
        for id in &self.queue {
            self.marked[id.index()] = false;
        }
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::Worklist;
    use crate::network::InstanceId;

    #[test]
    fn test_mark_once() {
        let mut w = Worklist::new(4);
        let a = InstanceId::from_index(2);
        let b = InstanceId::from_index(0);
        w.mark(a);
        w.mark(b);
        w.mark(a);
        assert_eq!(w.len(), 2);
        assert!(w.contains(a));
        assert_eq!(w.take(), vec![a, b]);
        assert!(w.is_empty());
        assert!(!w.contains(a));
        w.mark(a);
        assert_eq!(w.take(), vec![a]);
    }
}
