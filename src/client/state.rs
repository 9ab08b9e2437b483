use tokio::sync::watch;

/// Single-owner state value. Mutations go through [`StateCell::update`] and
/// wake every receiver handed out by [`StateCell::subscribe`].
#[derive(Debug)]
pub struct StateCell<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> StateCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    pub fn replace(&self, state: S) {
        self.tx.send_replace(state);
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Clone + Default> Default for StateCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_notifies_subscribers() {
        let cell = StateCell::new(0u32);
        let mut rx = cell.subscribe();

        cell.update(|n| *n += 2);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 2);
        assert_eq!(cell.snapshot(), 2);
    }

    #[test]
    fn test_update_without_subscribers() {
        let cell: StateCell<Vec<String>> = StateCell::default();
        cell.update(|v| v.push("onion".to_string()));
        cell.replace(vec!["garlic".to_string()]);
        assert_eq!(cell.read(|v| v.clone()), vec!["garlic".to_string()]);
    }
}
