mod test_notify_on_leave;
